use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use ytdl_preload::cli::{Cli, Command};
use ytdl_preload::domain::{CACHE_FILE_PATTERN, TrustPolicy, derive_file_name};
use ytdl_preload::error::AppError;
use ytdl_preload::fetcher::YtDlpFetcher;
use ytdl_preload::host::{self, HostCommand, HostEffect};
use ytdl_preload::logging;
use ytdl_preload::notify::ConsoleNotifier;
use ytdl_preload::playlist::MemoryPlaylist;
use ytdl_preload::preload::{PreloadConfig, Preloader, spawn_preload_actor};
use ytdl_preload::settings::{
    PreloadSettings, default_data_dir, load_settings, save_settings,
};
use ytdl_preload::store::{FileStore, FsFileStore};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);

    let _log_guard = logging::init(
        &data_dir,
        logging::LogConfig {
            dir: cli.log_dir.clone(),
            filter: cli.log_filter.clone(),
        },
    );
    tracing::info!(data_dir = %data_dir.display(), "ytdl-preload 启动");

    let mut settings = load_settings(&data_dir);
    cli.apply_overrides(&mut settings);

    let command = cli.command.unwrap_or(Command::Run {
        entries: Vec::new(),
        playlist_file: None,
    });

    match command {
        Command::Run {
            entries,
            playlist_file,
        } => run_host(&data_dir, &settings, entries, playlist_file).await,
        Command::Key { references } => {
            let trust = TrustPolicy::new(&settings.trusted_domains);
            for reference in references {
                println!(
                    "{}\t{}\t{reference}",
                    derive_file_name(&reference, &settings.file_extension),
                    if trust.is_trusted(&reference) {
                        "trusted"
                    } else {
                        "-"
                    },
                );
            }
            Ok(())
        }
        Command::Clean => {
            let dir = settings.resolve_download_dir(&data_dir);
            let removed = FsFileStore.delete_by_pattern(&dir, CACHE_FILE_PATTERN);
            tracing::info!(dir = %dir.display(), removed, "手动清理完成");
            println!("已删除 {removed} 个缓存文件 ({})", dir.display());
            Ok(())
        }
        Command::Init => {
            save_settings(&data_dir, &settings)?;
            println!("设置已写入 {}", data_dir.join("settings.json").display());
            Ok(())
        }
    }
}

async fn run_host(
    data_dir: &Path,
    settings: &PreloadSettings,
    mut entries: Vec<String>,
    playlist_file: Option<PathBuf>,
) -> Result<(), AppError> {
    if let Some(path) = playlist_file {
        entries.extend(host::read_playlist_file(&path)?);
    }
    let playlist = MemoryPlaylist::new(entries);

    let config = PreloadConfig::from_settings(settings, data_dir);
    let preloader = Preloader::new(playlist.clone(), FsFileStore, ConsoleNotifier, config);
    let handle = spawn_preload_actor(preloader, YtDlpFetcher::new(&settings.ytdl_path));

    println!("{}", host::format_playlist(&playlist));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("收到 Ctrl-C，准备退出");
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let cmd = match HostCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match host::apply(&cmd, &playlist) {
            HostEffect::Changed { position, length } => {
                if length {
                    handle.length_changed().await?;
                }
                if position {
                    handle.position_changed().await?;
                }
            }
            HostEffect::Print(text) => println!("{text}"),
            HostEffect::Status => {
                let snap = handle.snapshot().await?;
                println!("{}", host::format_snapshot(&snap));
            }
            HostEffect::Rejected(msg) => eprintln!("{msg}"),
            HostEffect::Quit => break,
        }
    }

    let removed = handle.shutdown().await?;
    tracing::info!(removed, "ytdl-preload 退出");
    Ok(())
}
