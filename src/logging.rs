use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// 未指定过滤规则且 `RUST_LOG` 为空时使用：本 crate 记到 debug，依赖只记 info
const DEFAULT_FILTER: &str = "info,ytdl_preload=debug";

const LOG_FILE_PREFIX: &str = "ytdl-preload.log";

/// 持有期间后台日志线程保持运行，drop 时刷盘
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
}

pub fn init(data_dir: &Path, cfg: LogConfig) -> LogGuard {
    let log_dir = resolve_log_dir(data_dir, cfg.dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(cfg.filter))
        .with(file_layer);

    let _ = subscriber.try_init();
    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");

    LogGuard(Some(guard))
}

/// 日志目录：显式指定 > `{data_dir}/logs` > 临时目录
fn resolve_log_dir(data_dir: &Path, dir: Option<PathBuf>) -> PathBuf {
    let preferred = dir.unwrap_or_else(|| data_dir.join("logs"));
    if fs::create_dir_all(&preferred).is_ok() {
        return preferred;
    }
    let fallback = std::env::temp_dir().join("ytdl-preload-logs");
    let _ = fs::create_dir_all(&fallback);
    fallback
}

fn build_filter(explicit: Option<String>) -> EnvFilter {
    match explicit.filter(|s| !s.trim().is_empty()) {
        Some(s) => EnvFilter::new(s),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn log_dir_defaults_under_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = resolve_log_dir(dir.path(), None);
        assert_eq!(resolved, dir.path().join("logs"));
        assert!(resolved.is_dir());
    }

    #[test]
    fn unusable_log_dir_falls_back_to_temp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").expect("write");

        let resolved = resolve_log_dir(dir.path(), Some(blocker.join("logs")));
        assert_eq!(resolved, std::env::temp_dir().join("ytdl-preload-logs"));
    }

    #[test]
    fn explicit_filter_wins() {
        let filter = build_filter(Some("warn".to_owned()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn default_filter_enables_crate_debug() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).expect("valid directives");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
