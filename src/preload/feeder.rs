//! 扫描预载窗口，把未见过的远程引用送入队列

use std::ops::Range;

use super::tasks::TaskQueue;
use crate::domain::is_remote;
use crate::playlist::Sequence;

/// 预载窗口 `p+1 ..= min(p+K, n-1)`；无播放位置时按 0 计算
pub fn lookahead_window(position: Option<usize>, len: usize, lookahead: usize) -> Range<usize> {
    let p = position.unwrap_or(0);
    let start = p.saturating_add(1);
    let end = p.saturating_add(lookahead).saturating_add(1).min(len);
    start..end.max(start)
}

/// 返回本次新入队的数量
pub fn feed<S: Sequence + ?Sized>(sequence: &S, lookahead: usize, tasks: &mut TaskQueue) -> usize {
    let window = lookahead_window(sequence.active_position(), sequence.len(), lookahead);
    let mut added = 0usize;
    for i in window {
        let Some(value) = sequence.entry_at(i) else {
            continue;
        };
        if !is_remote(&value) || tasks.is_pending(&value) {
            continue;
        }
        if tasks.enqueue(&value) {
            tracing::debug!(index = i, reference = %value, "加入预载队列");
            added += 1;
        }
    }
    added
}
