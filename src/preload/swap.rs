//! 下载完成后把远程引用替换为本地文件

use super::ledger::CacheLedger;
use crate::notify::Notifier;
use crate::playlist::Sequence;
pub use crate::playlist::SwapOutcome;

/// 按值重新定位 `reference`，必要时原位替换为 `local`
///
/// 定位、播放判断与替换由 [`Sequence::replace_unless_active`] 一次完成，
/// 宿主同时跳转时不会删掉正在播放的条目。
pub fn swap_in<S: Sequence + ?Sized>(sequence: &mut S, reference: &str, local: &str) -> SwapOutcome {
    sequence.replace_unless_active(reference, local)
}

/// 替换并登记到账本；三种结果都会登记，避免留下无人清理的文件
pub fn complete<S, N>(
    sequence: &mut S,
    ledger: &mut CacheLedger,
    notifier: &N,
    reference: &str,
    local: &str,
) -> SwapOutcome
where
    S: Sequence + ?Sized,
    N: Notifier + ?Sized,
{
    let outcome = swap_in(sequence, reference, local);
    ledger.record(local, reference);

    match outcome {
        SwapOutcome::Missing => {
            tracing::info!(reference, local, "引用已不在播放列表中，仅登记缓存");
        }
        SwapOutcome::Deferred { index } => {
            tracing::info!(reference, local, index, "引用正在播放，延迟替换");
        }
        SwapOutcome::Swapped { index } => {
            tracing::info!(reference, local, index, "已替换为本地文件");
            notifier.info(&format!("已预载 #{}: {reference}", index + 1));
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::MemoryPlaylist;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Notifier for Recorder {
        fn info(&self, message: &str) {
            self.0.borrow_mut().push(message.to_owned());
        }
    }

    #[test]
    fn swap_preserves_length_and_index() {
        let mut list = MemoryPlaylist::new(["/c/0", "https://a/1", "https://a/2"]);
        let before = list.len();

        let outcome = swap_in(&mut list, "https://a/1", "/c/1");
        assert_eq!(outcome, SwapOutcome::Swapped { index: 1 });
        assert_eq!(list.len(), before);
        assert_eq!(list.entries(), vec!["/c/0", "/c/1", "https://a/2"]);
        assert_eq!(list.active_position(), Some(0));
    }

    #[test]
    fn relocates_after_shift() {
        let mut list = MemoryPlaylist::new(["/c/0", "https://a/1", "https://a/2"]);
        // 宿主在前面插入了条目，引用下标从 2 变为 3
        list.insert_at(1, "/c/new".to_owned());
        let outcome = swap_in(&mut list, "https://a/2", "/c/2");
        assert_eq!(outcome, SwapOutcome::Swapped { index: 3 });
        assert_eq!(list.entry_at(3).as_deref(), Some("/c/2"));
    }

    #[test]
    fn active_reference_is_deferred() {
        let mut list = MemoryPlaylist::new(["https://a/0", "https://a/1"]);
        let mut ledger = CacheLedger::new();
        let notifier = Recorder::default();

        let outcome = complete(&mut list, &mut ledger, &notifier, "https://a/0", "/c/0");
        assert_eq!(outcome, SwapOutcome::Deferred { index: 0 });
        assert_eq!(list.entries(), vec!["https://a/0", "https://a/1"]);
        assert_eq!(ledger.paths(), vec!["/c/0"]);
        assert!(notifier.0.borrow().is_empty());
    }

    #[test]
    fn missing_reference_still_recorded() {
        let mut list = MemoryPlaylist::new(["/c/0"]);
        let mut ledger = CacheLedger::new();
        let notifier = Recorder::default();

        let outcome = complete(&mut list, &mut ledger, &notifier, "https://gone", "/c/g");
        assert_eq!(outcome, SwapOutcome::Missing);
        assert_eq!(list.len(), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn successful_swap_notifies() {
        let mut list = MemoryPlaylist::new(["/c/0", "https://a/1"]);
        let mut ledger = CacheLedger::new();
        let notifier = Recorder::default();

        complete(&mut list, &mut ledger, &notifier, "https://a/1", "/c/1");
        assert_eq!(notifier.0.borrow().len(), 1);
        assert!(notifier.0.borrow()[0].contains("https://a/1"));
    }

    /// 只实现单步操作，替换走 trait 的默认实现；当前条目固定在下标 0
    struct Plain(Vec<String>);

    impl Sequence for Plain {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn active_position(&self) -> Option<usize> {
            (!self.0.is_empty()).then_some(0)
        }

        fn entry_at(&self, index: usize) -> Option<String> {
            self.0.get(index).cloned()
        }

        fn insert_at(&mut self, index: usize, value: String) {
            self.0.insert(index, value);
        }

        fn move_entry(&mut self, from: usize, to: usize) {
            let value = self.0.remove(from);
            self.0.insert(to, value);
        }

        fn remove_at(&mut self, index: usize) {
            self.0.remove(index);
        }
    }

    #[test]
    fn default_replace_uses_insert_move_remove() {
        let mut seq = Plain(vec!["/c/0".to_owned(), "https://a/1".to_owned(), "https://a/2".to_owned()]);
        assert_eq!(swap_in(&mut seq, "https://a/2", "/c/2"), SwapOutcome::Swapped { index: 2 });
        assert_eq!(seq.0, vec!["/c/0", "https://a/1", "/c/2"]);
        assert_eq!(swap_in(&mut seq, "/c/0", "/c/x"), SwapOutcome::Deferred { index: 0 });
        assert_eq!(swap_in(&mut seq, "https://gone", "/c/g"), SwapOutcome::Missing);
        assert_eq!(seq.0.len(), 3);
    }
}
