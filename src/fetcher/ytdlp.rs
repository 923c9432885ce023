use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use super::{FetchRequest, Fetcher};
use crate::error::FetchError;

/// 通过外部 yt-dlp（或兼容程序）下载
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl Fetcher for YtDlpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<(), FetchError> {
        let args = request.to_args();
        tracing::debug!(program = %self.program.display(), ?args, "启动下载器");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| FetchError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(FetchError::Exit {
                reference: request.reference,
                code: status.code(),
            });
        }
        if !tokio::fs::try_exists(&request.destination)
            .await
            .unwrap_or(false)
        {
            return Err(FetchError::MissingOutput(request.destination));
        }
        Ok(())
    }
}
