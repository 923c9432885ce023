//! 预载 actor 相关错误

/// 与预载 actor 通信失败
#[derive(Debug, thiserror::Error)]
pub enum PreloadError {
    /// 命令通道已关闭（actor 已退出）
    #[error("预载 actor 已停止")]
    Closed,

    /// actor 任务 panic 或被取消
    #[error("预载 actor 异常退出: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for PreloadError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        PreloadError::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for PreloadError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        PreloadError::Closed
    }
}
