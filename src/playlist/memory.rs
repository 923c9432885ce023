use std::sync::{Arc, Mutex, MutexGuard};

use super::{Removal, Sequence, SwapOutcome, plan};

#[derive(Debug, Clone)]
struct Item {
    id: u64,
    value: String,
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<Item>,
    active: Option<u64>,
    next_id: u64,
}

impl Inner {
    fn alloc(&mut self, value: String) -> Item {
        self.next_id = self.next_id.wrapping_add(1);
        Item {
            id: self.next_id,
            value,
        }
    }

    fn active_index(&self) -> Option<usize> {
        let id = self.active?;
        self.items.iter().position(|it| it.id == id)
    }

    fn activate(&mut self, index: usize) -> bool {
        let Some(id) = self.items.get(index).map(|it| it.id) else {
            return false;
        };
        self.active = Some(id);
        true
    }
}

/// 共享的内存播放列表
///
/// 当前播放条目按身份（而非下标）跟踪，插入/移动/删除后 `active_position`
/// 仍指向同一条目。克隆得到的是同一份列表的句柄，宿主与预载 actor 各持一份。
#[derive(Debug, Clone, Default)]
pub struct MemoryPlaylist {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryPlaylist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = Self::default();
        {
            let mut inner = list.lock();
            for value in entries {
                let item = inner.alloc(value.into());
                inner.items.push(item);
            }
            inner.active = inner.items.first().map(|it| it.id);
        }
        list
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // 持锁期间不会 panic，中毒时直接取回数据
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().items.iter().map(|it| it.value.clone()).collect()
    }

    pub fn push(&self, value: impl Into<String>) {
        let mut inner = self.lock();
        let item = inner.alloc(value.into());
        inner.items.push(item);
        if inner.active.is_none() {
            inner.active = inner.items.first().map(|it| it.id);
        }
    }

    pub fn set_active(&self, index: usize) -> bool {
        self.lock().activate(index)
    }

    /// 前进到下一条；已在末尾时返回 false
    pub fn next(&self) -> bool {
        let mut inner = self.lock();
        let target = inner.active_index().map_or(0, |i| i + 1);
        inner.activate(target)
    }

    pub fn prev(&self) -> bool {
        let mut inner = self.lock();
        match inner.active_index().and_then(|i| i.checked_sub(1)) {
            Some(target) => inner.activate(target),
            None => false,
        }
    }

    /// 宿主侧删除；删除当前条目时播放位置顺延到同一下标的条目
    pub fn remove(&self, index: usize) -> bool {
        let mut inner = self.lock();
        if index >= inner.items.len() {
            return false;
        }
        let removed = inner.items.remove(index);
        if inner.active == Some(removed.id) {
            let next = index.min(inner.items.len().saturating_sub(1));
            inner.active = inner.items.get(next).map(|it| it.id);
        }
        true
    }
}

impl Sequence for MemoryPlaylist {
    fn len(&self) -> usize {
        self.lock().items.len()
    }

    fn active_position(&self) -> Option<usize> {
        self.lock().active_index()
    }

    fn entry_at(&self, index: usize) -> Option<String> {
        self.lock().items.get(index).map(|it| it.value.clone())
    }

    fn insert_at(&mut self, index: usize, value: String) {
        let mut inner = self.lock();
        let index = index.min(inner.items.len());
        let item = inner.alloc(value);
        inner.items.insert(index, item);
    }

    fn move_entry(&mut self, from: usize, to: usize) {
        let mut inner = self.lock();
        let len = inner.items.len();
        if from >= len || to >= len || from == to {
            return;
        }
        let item = inner.items.remove(from);
        inner.items.insert(to, item);
    }

    fn remove_at(&mut self, index: usize) {
        let mut inner = self.lock();
        if index >= inner.items.len() {
            return;
        }
        let removed = inner.items.remove(index);
        if inner.active == Some(removed.id) {
            inner.active = None;
        }
    }

    fn replace_unless_active(&mut self, reference: &str, local: &str) -> SwapOutcome {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let found = inner.items.iter().position(|it| it.value == reference);
        let outcome = plan(found, inner.active_index());
        if let SwapOutcome::Swapped { index } = outcome {
            let item = inner.alloc(local.to_owned());
            inner.items.push(item);
            let end = inner.items.len() - 1;
            let item = inner.items.remove(end);
            inner.items.insert(index, item);
            inner.items.remove(index + 1);
        }
        outcome
    }

    fn remove_unless_active(
        &mut self,
        target: &dyn Fn(&str) -> bool,
        protected: &dyn Fn(&str) -> bool,
    ) -> Removal {
        let mut inner = self.lock();
        let active = inner.active_index();
        if active.is_some_and(|i| protected(&inner.items[i].value)) {
            return Removal::Blocked;
        }
        let found = inner
            .items
            .iter()
            .enumerate()
            .find(|(i, it)| Some(*i) != active && target(&it.value))
            .map(|(i, _)| i);
        match found {
            Some(index) => {
                inner.items.remove(index);
                Removal::Removed { index }
            }
            None => Removal::Absent,
        }
    }
}
