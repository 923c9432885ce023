use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::preloader::Preloader;
use super::messages::{PreloadCommand, PreloadSnapshot};
use crate::error::{FetchError, PreloadError};
use crate::fetcher::Fetcher;
use crate::notify::Notifier;
use crate::playlist::Sequence;
use crate::store::FileStore;

#[derive(Debug)]
struct JobResult {
    reference: String,
    target: PathBuf,
    result: Result<(), FetchError>,
}

/// 预载 actor 句柄
#[derive(Debug)]
pub struct PreloadHandle {
    tx: mpsc::Sender<PreloadCommand>,
    join: JoinHandle<usize>,
}

impl PreloadHandle {
    pub async fn position_changed(&self) -> Result<(), PreloadError> {
        self.tx.send(PreloadCommand::PositionChanged).await?;
        Ok(())
    }

    pub async fn length_changed(&self) -> Result<(), PreloadError> {
        self.tx.send(PreloadCommand::LengthChanged).await?;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<PreloadSnapshot, PreloadError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(PreloadCommand::Snapshot { reply }).await?;
        Ok(rx.await?)
    }

    /// 发送退出命令并等待 actor 结束，返回清理掉的文件数
    pub async fn shutdown(self) -> Result<usize, PreloadError> {
        // actor 可能已因通道关闭而退出，此时仍等待其清理结果
        let _ = self.tx.send(PreloadCommand::Shutdown).await;
        Ok(self.join.await?)
    }
}

/// 启动预载 actor（需在 tokio runtime 内调用）
///
/// actor 独占 [`Preloader`]，串行处理宿主通知与下载完成回调；同一时刻最多一个下载在进行。
pub fn spawn_preload_actor<S, FS, N, F>(preloader: Preloader<S, FS, N>, fetcher: F) -> PreloadHandle
where
    S: Sequence + Send + 'static,
    FS: FileStore + Send + 'static,
    N: Notifier + Send + 'static,
    F: Fetcher,
{
    let (tx_cmd, rx_cmd) = mpsc::channel::<PreloadCommand>(256);
    let join = tokio::spawn(run(preloader, Arc::new(fetcher), rx_cmd));
    PreloadHandle { tx: tx_cmd, join }
}

async fn run<S, FS, N, F>(
    mut preloader: Preloader<S, FS, N>,
    fetcher: Arc<F>,
    mut rx_cmd: mpsc::Receiver<PreloadCommand>,
) -> usize
where
    S: Sequence + Send + 'static,
    FS: FileStore + Send + 'static,
    N: Notifier + Send + 'static,
    F: Fetcher,
{
    let (tx_done, mut rx_done) = mpsc::channel::<JobResult>(4);

    preloader.bootstrap();
    preloader.on_position_changed();
    tracing::info!("PreloadActor 已启动");

    loop {
        // 空闲时启动下一个下载；由循环驱动而非在回调中递归
        if let Some(request) = preloader.next_job() {
            let fetcher = Arc::clone(&fetcher);
            let tx_done = tx_done.clone();
            tokio::spawn(async move {
                let reference = request.reference.clone();
                let target = request.destination.clone();
                let result = fetcher.fetch(request).await;
                let _ = tx_done
                    .send(JobResult {
                        reference,
                        target,
                        result,
                    })
                    .await;
            });
        }

        tokio::select! {
            maybe_cmd = rx_cmd.recv() => {
                match maybe_cmd {
                    Some(PreloadCommand::PositionChanged) => {
                        preloader.on_position_changed();
                    }
                    Some(PreloadCommand::LengthChanged) => {
                        preloader.on_length_changed();
                    }
                    Some(PreloadCommand::Snapshot { reply }) => {
                        let _ = reply.send(preloader.snapshot());
                    }
                    Some(PreloadCommand::Shutdown) | None => {
                        return preloader.shutdown();
                    }
                }
            }
            Some(done) = rx_done.recv() => {
                preloader.finish(&done.reference, &done.target, done.result);
            }
        }
    }
}
