//! 面向用户的状态提示

/// 非阻塞、发出即忘的提示接口
pub trait Notifier {
    fn info(&self, message: &str);
}

/// 只写日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "ytdl_preload::notify", "{message}");
    }
}

/// 写日志并输出到 stderr（命令行宿主使用）
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "ytdl_preload::notify", "{message}");
        eprintln!("[preload] {message}");
    }
}
