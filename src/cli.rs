use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::PreloadSettings;

#[derive(Debug, Parser)]
#[command(
    name = "ytdl-preload",
    version,
    about = "播放列表预载：提前下载后续远程条目并原位替换为本地文件"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// 覆盖数据目录（默认走系统 data_local_dir）
    #[arg(long, env = "YTDL_PRELOAD_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// 覆盖日志目录（默认 `{data_dir}/logs`）
    #[arg(long, env = "YTDL_PRELOAD_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// 覆盖日志过滤（等价于设置 RUST_LOG）
    #[arg(long, env = "RUST_LOG", global = true)]
    pub log_filter: Option<String>,

    /// 覆盖缓存目录（默认 `{data_dir}/cache`）
    #[arg(long, env = "YTDL_PRELOAD_DOWNLOAD_DIR", global = true)]
    pub download_dir: Option<PathBuf>,

    /// 预载窗口/缓存上限
    #[arg(long, env = "YTDL_PRELOAD_LIMIT", global = true)]
    pub limit: Option<usize>,

    /// 下载格式选择
    #[arg(long, env = "YTDL_PRELOAD_FORMAT", global = true)]
    pub format: Option<String>,

    /// 下载器路径
    #[arg(long, env = "YTDL_PRELOAD_YTDL_PATH", global = true)]
    pub ytdl_path: Option<PathBuf>,
}

impl Cli {
    /// 命令行参数覆盖设置文件
    pub fn apply_overrides(&self, settings: &mut PreloadSettings) {
        if let Some(v) = self.download_dir.clone() {
            settings.download_dir = Some(v);
        }
        if let Some(v) = self.limit {
            settings.limit = v;
        }
        if let Some(v) = self.format.clone() {
            settings.format = v;
        }
        if let Some(v) = self.ytdl_path.clone() {
            settings.ytdl_path = v;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 交互式播放列表（默认）：从 stdin 读取 next/prev/goto/add/remove/list/status/quit
    Run {
        /// 初始条目
        entries: Vec<String>,

        /// 从文件读取条目（每行一个，忽略空行与 # 注释）
        #[arg(long)]
        playlist_file: Option<PathBuf>,
    },

    /// 打印引用对应的缓存文件名与白名单判定
    Key { references: Vec<String> },

    /// 清理缓存目录中的预载文件
    Clean,

    /// 把当前生效的设置写入 `{data_dir}/settings.json`
    Init,
}
