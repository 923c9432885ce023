use tokio::sync::oneshot;

#[derive(Debug)]
pub enum PreloadCommand {
    /// 宿主的播放位置变化
    PositionChanged,
    /// 宿主的列表长度变化
    LengthChanged,
    Snapshot {
        reply: oneshot::Sender<PreloadSnapshot>,
    },
    /// 清理缓存并退出；不等待正在进行的下载
    Shutdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadSnapshot {
    pub queued: Vec<String>,
    pub pending: usize,
    pub busy: bool,
    pub ledger: Vec<String>,
}
