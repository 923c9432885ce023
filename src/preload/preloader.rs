use std::path::{Path, PathBuf};

use super::feeder;
use super::ledger::CacheLedger;
use super::messages::PreloadSnapshot;
use super::swap::{self, SwapOutcome};
use super::tasks::TaskQueue;
use crate::domain::{CACHE_FILE_PATTERN, TrustPolicy, derive_file_name};
use crate::error::FetchError;
use crate::fetcher::FetchRequest;
use crate::notify::Notifier;
use crate::playlist::Sequence;
use crate::settings::PreloadSettings;
use crate::store::FileStore;

/// 启动时确定、运行期不变的预载参数
#[derive(Debug, Clone)]
pub struct PreloadConfig {
    pub download_dir: PathBuf,
    pub file_extension: String,
    pub format: String,
    pub extra_options: Vec<String>,
    /// 预载窗口大小，同时也是账本上限
    pub limit: usize,
    pub trust: TrustPolicy,
}

impl PreloadConfig {
    pub fn from_settings(settings: &PreloadSettings, data_dir: &Path) -> Self {
        Self {
            download_dir: settings.resolve_download_dir(data_dir),
            file_extension: settings.file_extension.clone(),
            format: settings.format.clone(),
            extra_options: settings.extra_options(),
            limit: settings.limit,
            trust: TrustPolicy::new(&settings.trusted_domains),
        }
    }
}

/// 预载核心状态：队列、账本与外部协作者
///
/// 所有修改都在同一个执行上下文中完成；下载本身由调用方异步执行，
/// 结束后通过 [`Preloader::finish`] 回到这里。
pub struct Preloader<S, FS, N> {
    sequence: S,
    store: FS,
    notifier: N,
    config: PreloadConfig,
    tasks: TaskQueue,
    ledger: CacheLedger,
}

impl<S, FS, N> Preloader<S, FS, N>
where
    S: Sequence,
    FS: FileStore,
    N: Notifier,
{
    pub fn new(sequence: S, store: FS, notifier: N, config: PreloadConfig) -> Self {
        Self {
            sequence,
            store,
            notifier,
            config,
            tasks: TaskQueue::new(),
            ledger: CacheLedger::new(),
        }
    }

    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    pub fn ledger(&self) -> &CacheLedger {
        &self.ledger
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn config(&self) -> &PreloadConfig {
        &self.config
    }

    /// 确保缓存目录存在；失败时改用临时目录
    pub fn bootstrap(&mut self) {
        let dir = self.config.download_dir.clone();
        if let Err(e) = self.store.ensure_dir(&dir) {
            let fallback = std::env::temp_dir().join("ytdl-preload");
            tracing::warn!(
                dir = %dir.display(),
                fallback = %fallback.display(),
                err = %e,
                "创建缓存目录失败，改用临时目录"
            );
            if let Err(e) = self.store.ensure_dir(&fallback) {
                tracing::error!(dir = %fallback.display(), err = %e, "创建临时缓存目录失败");
            }
            self.config.download_dir = fallback;
        }
        tracing::info!(
            dir = %self.config.download_dir.display(),
            limit = self.config.limit,
            "预载已就绪"
        );
    }

    pub fn on_position_changed(&mut self) -> usize {
        self.evict();
        self.feed()
    }

    pub fn on_length_changed(&mut self) -> usize {
        self.evict();
        self.feed()
    }

    fn feed(&mut self) -> usize {
        feeder::feed(&self.sequence, self.config.limit, &mut self.tasks)
    }

    fn evict(&mut self) {
        let report = self
            .ledger
            .evict(self.config.limit, &mut self.sequence, &self.store);
        if report.blocked {
            tracing::debug!(
                removed = report.removed.len(),
                cached = self.ledger.len(),
                limit = self.config.limit,
                "最旧缓存正在播放，暂停淘汰"
            );
        } else if !report.removed.is_empty() {
            tracing::debug!(removed = report.removed.len(), cached = self.ledger.len(), "淘汰完成");
        }
    }

    pub fn target_for(&self, reference: &str) -> PathBuf {
        self.config
            .download_dir
            .join(derive_file_name(reference, &self.config.file_extension))
    }

    fn request_for(&self, reference: String, destination: PathBuf) -> FetchRequest {
        let relaxed_extension = self.config.trust.is_trusted(&reference);
        FetchRequest {
            reference,
            destination,
            format: self.config.format.clone(),
            extra_options: self.config.extra_options.clone(),
            relaxed_extension,
        }
    }

    /// 取出下一个需要真正下载的任务（进入 Busy）
    ///
    /// 目标文件已存在时当场完成替换并继续取下一个，不调用下载器；
    /// Busy 或队列为空时返回 None。
    pub fn next_job(&mut self) -> Option<FetchRequest> {
        loop {
            let reference = self.tasks.try_advance()?;
            let target = self.target_for(&reference);
            if self.store.exists(&target) {
                tracing::debug!(reference = %reference, target = %target.display(), "目标已存在，跳过下载");
                self.finish(&reference, &target, Ok(()));
                continue;
            }
            tracing::info!(reference = %reference, target = %target.display(), "开始预载");
            return Some(self.request_for(reference, target));
        }
    }

    /// 下载结束（无论成败）：替换、移出 pending、淘汰、回到 Idle
    pub fn finish(
        &mut self,
        reference: &str,
        local: &Path,
        result: Result<(), FetchError>,
    ) -> Option<SwapOutcome> {
        let outcome = match result {
            Ok(()) => {
                let local = local.to_string_lossy();
                Some(swap::complete(
                    &mut self.sequence,
                    &mut self.ledger,
                    &self.notifier,
                    reference,
                    &local,
                ))
            }
            Err(e) => {
                tracing::warn!(reference, err = %e, "预载失败");
                self.notifier.info(&format!("预载失败: {e}"));
                None
            }
        };

        self.tasks.release(reference);
        self.evict();
        self.tasks.mark_idle();
        outcome
    }

    /// 退出清理：按文件名模式删除缓存目录中的全部预载文件
    pub fn shutdown(&mut self) -> usize {
        let removed = self
            .store
            .delete_by_pattern(&self.config.download_dir, CACHE_FILE_PATTERN);
        tracing::info!(
            dir = %self.config.download_dir.display(),
            removed,
            busy = self.tasks.is_busy(),
            "预载缓存已清理"
        );
        removed
    }

    pub fn snapshot(&self) -> PreloadSnapshot {
        PreloadSnapshot {
            queued: self.tasks.queued().map(str::to_owned).collect(),
            pending: self.tasks.pending_len(),
            busy: self.tasks.is_busy(),
            ledger: self.ledger.paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::MemoryPlaylist;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct FakeStore {
        files: Rc<RefCell<HashSet<PathBuf>>>,
    }

    impl FakeStore {
        fn add(&self, path: &Path) {
            self.files.borrow_mut().insert(path.to_path_buf());
        }

        fn has(&self, path: &str) -> bool {
            self.files.borrow().contains(Path::new(path))
        }
    }

    impl FileStore for FakeStore {
        fn exists(&self, path: &Path) -> bool {
            self.files.borrow().contains(path)
        }

        fn delete(&self, path: &Path) -> bool {
            self.files.borrow_mut().remove(path)
        }

        fn ensure_dir(&self, _dir: &Path) -> std::io::Result<()> {
            Ok(())
        }

        fn delete_by_pattern(&self, dir: &Path, pattern: &str) -> usize {
            let Ok(pattern) = glob::Pattern::new(pattern) else {
                return 0;
            };
            let mut files = self.files.borrow_mut();
            let before = files.len();
            files.retain(|p| {
                !(p.parent() == Some(dir)
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| pattern.matches(n)))
            });
            before - files.len()
        }
    }

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Notifier for Recorder {
        fn info(&self, message: &str) {
            self.0.borrow_mut().push(message.to_owned());
        }
    }

    fn config(limit: usize) -> PreloadConfig {
        PreloadConfig {
            download_dir: PathBuf::from("/cache"),
            file_extension: "mkv".to_owned(),
            format: "bv*+ba/b".to_owned(),
            extra_options: vec!["--a".to_owned(), "--b".to_owned()],
            limit,
            trust: TrustPolicy::new(["youtu.be"]),
        }
    }

    fn local(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn url(i: usize) -> String {
        format!("https://youtu.be/v{i}")
    }

    fn setup(
        entries: Vec<String>,
        limit: usize,
    ) -> (Preloader<MemoryPlaylist, FakeStore, Recorder>, MemoryPlaylist, FakeStore, Recorder) {
        let list = MemoryPlaylist::new(entries);
        let store = FakeStore::default();
        let notifier = Recorder::default();
        let p = Preloader::new(list.clone(), store.clone(), notifier.clone(), config(limit));
        (p, list, store, notifier)
    }

    /// 模拟下载成功：写入目标文件并回调
    fn complete_ok(
        p: &mut Preloader<MemoryPlaylist, FakeStore, Recorder>,
        store: &FakeStore,
        job: &FetchRequest,
    ) -> Option<SwapOutcome> {
        store.add(&job.destination);
        p.finish(&job.reference, &job.destination, Ok(()))
    }

    #[test]
    fn request_carries_config_and_trust() {
        let (mut p, _list, _store, _n) =
            setup(vec!["/c/0".to_owned(), url(1), "https://other.net/x".to_owned()], 5);
        p.on_position_changed();

        let job = p.next_job().expect("job");
        assert_eq!(job.reference, url(1));
        assert_eq!(job.destination, p.target_for(&url(1)));
        assert_eq!(job.extra_options, vec!["--a", "--b"]);
        assert!(job.relaxed_extension);

        p.finish(&job.reference, &job.destination, Ok(()));
        let job = p.next_job().expect("job");
        assert!(!job.relaxed_extension);
    }

    #[test]
    fn lookahead_scenario_with_eviction() {
        let mut entries = vec!["/c/current".to_owned()];
        entries.extend((1..=6).map(url));
        let (mut p, list, store, notifier) = setup(entries, 5);

        assert_eq!(p.on_position_changed(), 5);
        assert_eq!(p.tasks().queued_len(), 5);

        for i in 1..=5 {
            let job = p.next_job().expect("job");
            assert_eq!(job.reference, url(i));
            // 串行：下载中不会再发出第二个任务
            assert!(p.next_job().is_none());
            let before = list.len();
            let outcome = complete_ok(&mut p, &store, &job);
            assert_eq!(outcome, Some(SwapOutcome::Swapped { index: i }));
            assert_eq!(list.len(), before);
            assert_eq!(list.entry_at(i), Some(local(&job.destination)));
        }
        assert_eq!(p.ledger().len(), 5);
        assert_eq!(notifier.0.borrow().len(), 5);
        assert!(p.next_job().is_none());

        // 前进后窗口覆盖 index 6
        list.set_active(2);
        assert_eq!(p.on_position_changed(), 1);
        let job = p.next_job().expect("job");
        assert_eq!(job.reference, url(6));
        complete_ok(&mut p, &store, &job);

        // 最旧的 index 1 被淘汰：文件删除、条目移出列表
        let first = local(&p.target_for(&url(1)));
        assert_eq!(p.ledger().len(), 5);
        assert!(!store.has(&first));
        assert!(list.position_of(&first).is_none());
        assert_eq!(list.active_position(), Some(1));
    }

    #[test]
    fn deferred_swap_blocks_eviction_until_active_moves() {
        let (mut p, list, store, _n) = setup(vec!["/c/0".to_owned(), url(1), url(2)], 1);
        p.on_position_changed();

        let job1 = p.next_job().expect("job");
        // 下载期间用户切到了该条目
        list.set_active(1);
        p.on_position_changed();
        let outcome = complete_ok(&mut p, &store, &job1);
        assert_eq!(outcome, Some(SwapOutcome::Deferred { index: 1 }));
        assert_eq!(list.entry_at(1), Some(url(1)));
        assert_eq!(p.ledger().len(), 1);

        let job2 = p.next_job().expect("job");
        complete_ok(&mut p, &store, &job2);
        // 超限但最旧条目对应正在播放的引用
        assert_eq!(p.ledger().len(), 2);
        let local1 = local(&job1.destination);
        assert!(store.has(&local1));

        list.set_active(2);
        p.on_position_changed();
        assert_eq!(p.ledger().len(), 1);
        assert!(!store.has(&local1));
        assert_eq!(list.entry_at(1), Some(url(1)));
    }

    #[test]
    fn failure_releases_and_continues() {
        let (mut p, list, store, notifier) = setup(vec!["/c/0".to_owned(), url(1), url(2)], 5);
        p.on_position_changed();

        let job = p.next_job().expect("job");
        let outcome = p.finish(
            &job.reference,
            &job.destination,
            Err(FetchError::Exit {
                reference: job.reference.clone(),
                code: Some(1),
            }),
        );
        assert_eq!(outcome, None);
        assert!(!p.tasks().is_pending(&url(1)));
        assert!(!p.tasks().is_busy());
        assert!(p.ledger().is_empty());
        assert_eq!(notifier.0.borrow().len(), 1);

        let job = p.next_job().expect("job");
        assert_eq!(job.reference, url(2));
        complete_ok(&mut p, &store, &job);
        assert_eq!(list.entry_at(1), Some(url(1)));
    }

    #[test]
    fn existing_target_skips_fetch() {
        let (mut p, list, store, _n) = setup(vec!["/c/0".to_owned(), url(1), url(2)], 5);
        store.add(&p.target_for(&url(1)));
        p.on_position_changed();

        // url(1) 当场完成，直接得到 url(2) 的下载任务
        let job = p.next_job().expect("job");
        assert_eq!(job.reference, url(2));
        assert_eq!(list.entry_at(1), Some(local(&p.target_for(&url(1)))));
        assert_eq!(p.ledger().len(), 1);
    }

    #[test]
    fn shutdown_removes_cache_files_only() {
        let (mut p, _list, store, _n) = setup(vec!["/c/0".to_owned()], 5);
        store.add(Path::new("/cache/preload-1-aa.mkv"));
        store.add(Path::new("/cache/preload-2-bb.mkv"));
        store.add(Path::new("/cache/other.mkv"));
        store.add(Path::new("/elsewhere/preload-3-cc.mkv"));

        assert_eq!(p.shutdown(), 2);
        assert!(store.has("/cache/other.mkv"));
        assert!(store.has("/elsewhere/preload-3-cc.mkv"));
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut p, _list, _store, _n) = setup(vec!["/c/0".to_owned(), url(1), url(2)], 5);
        p.on_position_changed();
        p.next_job();

        let snap = p.snapshot();
        assert!(snap.busy);
        assert_eq!(snap.queued, vec![url(2)]);
        assert_eq!(snap.pending, 2);
        assert!(snap.ledger.is_empty());
    }
}
