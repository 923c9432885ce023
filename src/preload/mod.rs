//! 有界预读与原位替换
//!
//! 宿主播放列表中当前位置之后的 K 个远程引用会被逐个下载为本地文件并原位替换，
//! 落后的文件按 FIFO 淘汰；正在播放的条目永远不会被替换、删除或淘汰。

mod actor;
mod preloader;
pub mod feeder;
pub mod ledger;
mod messages;
pub mod swap;
pub mod tasks;

pub use actor::{PreloadHandle, spawn_preload_actor};
pub use preloader::{PreloadConfig, Preloader};
pub use ledger::{CacheEntry, CacheLedger, EvictReport};
pub use messages::{PreloadCommand, PreloadSnapshot};
pub use swap::SwapOutcome;
pub use tasks::{TaskQueue, WorkerState};
