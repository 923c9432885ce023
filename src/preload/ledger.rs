//! 已落地文件的有序账本，按插入顺序（FIFO）淘汰

use std::collections::VecDeque;
use std::path::Path;

use crate::playlist::{Removal, Sequence};
use crate::store::FileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: String,
    /// 下载来源；延迟替换时播放列表中仍是它
    pub origin: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvictReport {
    pub removed: Vec<String>,
    /// 最旧条目正在播放，淘汰被挡住
    pub blocked: bool,
}

#[derive(Debug, Default)]
pub struct CacheLedger {
    entries: VecDeque<CacheEntry>,
}

impl CacheLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// 记录一个落地文件；同一路径只保留一条，重复记录时移到队尾
    pub fn record(&mut self, path: &str, origin: &str) {
        let key = normalize(path);
        self.entries.retain(|e| normalize(&e.path) != key);
        self.entries.push_back(CacheEntry {
            path: path.to_owned(),
            origin: origin.to_owned(),
        });
    }

    /// 超出 `limit` 时从最旧条目开始淘汰
    ///
    /// 最旧条目（或它的来源引用）正在播放时立即停止，不跳过、不继续淘汰更新的条目。
    /// 播放判断与删除条目在 [`Sequence::remove_unless_active`] 中一次完成，
    /// 之后才删除文件。
    pub fn evict<S, F>(&mut self, limit: usize, sequence: &mut S, store: &F) -> EvictReport
    where
        S: Sequence + ?Sized,
        F: FileStore + ?Sized,
    {
        let mut report = EvictReport::default();

        while self.entries.len() > limit {
            let Some(oldest) = self.entries.front() else {
                break;
            };
            let key = normalize(&oldest.path);
            let origin = oldest.origin.as_str();
            let removal = sequence.remove_unless_active(
                &|v: &str| normalize(v) == key,
                &|v: &str| normalize(v) == key || v == origin,
            );
            if removal == Removal::Blocked {
                report.blocked = true;
                break;
            }

            let Some(oldest) = self.entries.pop_front() else {
                break;
            };
            if !store.delete(Path::new(&oldest.path)) {
                tracing::warn!(path = %oldest.path, "淘汰缓存时删除文件失败，继续");
            }
            tracing::info!(path = %oldest.path, "已淘汰缓存");
            report.removed.push(oldest.path);
        }

        report
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}
