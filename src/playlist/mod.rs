//! 外部播放序列接口
//!
//! 预载核心只通过 [`Sequence`] 读写宿主的播放列表；索引随时可能被宿主改变，
//! 因此核心从不缓存索引，每次操作前都按值重新定位。

mod memory;

pub use memory::MemoryPlaylist;

/// 原位替换的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// 引用已不在播放列表中（被跳过或删除）
    Missing,
    /// 引用正在播放，不替换
    Deferred { index: usize },
    Swapped { index: usize },
}

/// 淘汰时删除条目的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// 当前播放条目受保护，未做任何修改
    Blocked,
    Removed { index: usize },
    Absent,
}

/// 下标规划：只依据替换时刻的快照，不信任入队时的下标
fn plan(found: Option<usize>, active: Option<usize>) -> SwapOutcome {
    match found {
        None => SwapOutcome::Missing,
        Some(index) if active == Some(index) => SwapOutcome::Deferred { index },
        Some(index) => SwapOutcome::Swapped { index },
    }
}

/// 宿主播放列表
///
/// 读操作与单步修改各自独立；[`replace_unless_active`](Sequence::replace_unless_active)
/// 和 [`remove_unless_active`](Sequence::remove_unless_active) 是多步的“定位 → 判断 → 修改”，
/// 默认实现由单步调用拼成。宿主在另一个执行上下文中同时修改列表时，
/// 实现必须覆盖这两个方法，在一次加锁内完成全部步骤。
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前正在播放的位置
    fn active_position(&self) -> Option<usize>;

    fn entry_at(&self, index: usize) -> Option<String>;

    /// 在 `index` 处插入（`index == len` 表示追加）
    fn insert_at(&mut self, index: usize, value: String);

    /// 将 `from` 处的条目移动到 `to`，移动后它位于下标 `to`
    fn move_entry(&mut self, from: usize, to: usize);

    fn remove_at(&mut self, index: usize);

    /// 当前播放条目的值
    fn active_entry(&self) -> Option<String> {
        self.active_position().and_then(|i| self.entry_at(i))
    }

    /// 按值查找第一个匹配条目的下标
    fn position_of(&self, value: &str) -> Option<usize> {
        (0..self.len()).find(|&i| self.entry_at(i).as_deref() == Some(value))
    }

    /// 按值重新定位 `reference`，不在播放时原位替换为 `local`
    ///
    /// 替换方式：追加到末尾 → 移动到原位置 → 删除被挤到 `index + 1` 的原条目，
    /// 列表长度保持不变。
    fn replace_unless_active(&mut self, reference: &str, local: &str) -> SwapOutcome {
        let outcome = plan(self.position_of(reference), self.active_position());
        if let SwapOutcome::Swapped { index } = outcome {
            let end = self.len();
            self.insert_at(end, local.to_owned());
            self.move_entry(end, index);
            self.remove_at(index + 1);
        }
        outcome
    }

    /// 删除第一个满足 `target` 的非播放条目
    ///
    /// 当前播放条目满足 `protected` 时不做任何修改，返回 [`Removal::Blocked`]。
    fn remove_unless_active(
        &mut self,
        target: &dyn Fn(&str) -> bool,
        protected: &dyn Fn(&str) -> bool,
    ) -> Removal {
        let active = self.active_position();
        if active
            .and_then(|i| self.entry_at(i))
            .is_some_and(|v| protected(&v))
        {
            return Removal::Blocked;
        }
        let found = (0..self.len())
            .filter(|&i| Some(i) != active)
            .find(|&i| self.entry_at(i).is_some_and(|v| target(&v)));
        match found {
            Some(index) => {
                self.remove_at(index);
                Removal::Removed { index }
            }
            None => Removal::Absent,
        }
    }
}
