//! 外部下载器接口

mod ytdlp;

pub use ytdlp::YtDlpFetcher;

use std::future::Future;
use std::path::PathBuf;

use crate::error::FetchError;

/// 单次下载请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub reference: String,
    pub destination: PathBuf,
    pub format: String,
    /// 透传给下载器的额外选项，见 [`PreloadSettings::extra_options`](crate::settings::PreloadSettings::extra_options)
    pub extra_options: Vec<String>,
    /// 来源可信时放宽输出扩展名检查
    pub relaxed_extension: bool,
}

impl FetchRequest {
    /// 下载器命令行参数
    ///
    /// 始终禁用 `.part` 临时文件并只取单个条目（忽略远端播放列表）。
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-part".to_owned(),
            "--no-playlist".to_owned(),
            "-f".to_owned(),
            self.format.clone(),
            "-o".to_owned(),
            self.destination.to_string_lossy().into_owned(),
        ];
        if let Some(ext) = self.destination.extension().and_then(|e| e.to_str()) {
            args.push("--merge-output-format".to_owned());
            args.push(ext.to_owned());
        }
        args.extend(self.extra_options.iter().cloned());
        if self.relaxed_extension {
            args.push("--compat-options".to_owned());
            args.push("allow-unsafe-ext".to_owned());
        }
        args.push("--".to_owned());
        args.push(self.reference.clone());
        args
    }
}

/// 异步下载器；完成（成功或失败）后返回，期间不占用预载 actor
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = Result<(), FetchError>> + Send;
}
