//! 统一错误处理模块
//!
//! 各模块的结构化错误类型，均由 thiserror 派生 Display/Error。

mod app;
mod fetch;
mod preload;

pub use app::{AppError, SettingsError};
pub use fetch::FetchError;
pub use preload::PreloadError;
