use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Idle,
    Busy,
}

/// 待下载队列 + pending 集合 + 串行 worker 状态
///
/// pending 覆盖"已入队"与"正在下载"两种情况，同一引用在其中时不会再次入队。
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<String>,
    pending: HashSet<String>,
    state: WorkerState,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队；已 pending 时返回 false
    pub fn enqueue(&mut self, reference: &str) -> bool {
        if !self.pending.insert(reference.to_owned()) {
            return false;
        }
        self.queue.push_back(reference.to_owned());
        true
    }

    pub fn is_pending(&self, reference: &str) -> bool {
        self.pending.contains(reference)
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == WorkerState::Busy
    }

    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Idle 且队列非空时取出队首并进入 Busy；否则什么都不做
    pub fn try_advance(&mut self) -> Option<String> {
        if self.is_busy() {
            return None;
        }
        let reference = self.queue.pop_front()?;
        self.state = WorkerState::Busy;
        Some(reference)
    }

    /// 任务结束（无论成败）：移出 pending
    pub fn release(&mut self, reference: &str) {
        self.pending.remove(reference);
    }

    pub fn mark_idle(&mut self) {
        self.state = WorkerState::Idle;
    }
}
