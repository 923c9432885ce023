//! 应用通用错误

use super::{FetchError, PreloadError};

/// 应用通用错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置错误
    #[error("设置错误: {0}")]
    Settings(#[from] SettingsError),

    /// 下载错误
    #[error("下载错误: {0}")]
    Fetch(#[from] FetchError),

    /// 预载 actor 错误
    #[error("预载错误: {0}")]
    Preload(#[from] PreloadError),
}

/// 设置相关错误
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// 保存设置失败
    #[error("保存设置失败({path}): {source}")]
    Save {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 序列化设置失败
    #[error("序列化设置失败: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// 读取播放列表文件失败
    #[error("读取播放列表失败({path}): {source}")]
    Playlist {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
