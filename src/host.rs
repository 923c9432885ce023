//! 命令行宿主：把 stdin 命令作用到内存播放列表，并告知预载 actor 发生了什么变化

use std::fs;
use std::path::Path;

use crate::domain::is_remote;
use crate::error::SettingsError;
use crate::playlist::{MemoryPlaylist, Sequence};
use crate::preload::PreloadSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Next,
    Prev,
    Goto(usize),
    Add(String),
    Remove(usize),
    List,
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    Changed { position: bool, length: bool },
    Print(String),
    Status,
    Quit,
    Rejected(String),
}

impl HostCommand {
    /// 解析一行输入；空行返回 `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let index = |what: &str| {
            rest.parse::<usize>()
                .map_err(|_| format!("{what} 需要一个下标: {line}"))
        };

        let cmd = match word {
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "goto" | "g" => Self::Goto(index("goto")?),
            "add" | "a" if !rest.is_empty() => Self::Add(rest.to_owned()),
            "add" | "a" => return Err("add 需要一个条目".to_owned()),
            "remove" | "rm" => Self::Remove(index("remove")?),
            "list" | "ls" => Self::List,
            "status" | "s" => Self::Status,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(format!("未知命令: {other}")),
        };
        Ok(Some(cmd))
    }
}

pub fn apply(cmd: &HostCommand, playlist: &MemoryPlaylist) -> HostEffect {
    let moved = |ok: bool, what: &str| {
        if ok {
            HostEffect::Changed {
                position: true,
                length: false,
            }
        } else {
            HostEffect::Rejected(format!("无法{what}"))
        }
    };

    match cmd {
        HostCommand::Next => moved(playlist.next(), "前进：已在末尾"),
        HostCommand::Prev => moved(playlist.prev(), "后退：已在开头"),
        HostCommand::Goto(i) => moved(playlist.set_active(*i), "跳转：下标越界"),
        HostCommand::Add(entry) => {
            let was_empty = playlist.is_empty();
            playlist.push(entry.clone());
            HostEffect::Changed {
                position: was_empty,
                length: true,
            }
        }
        HostCommand::Remove(i) => {
            let was_active = playlist.active_position() == Some(*i);
            if playlist.remove(*i) {
                HostEffect::Changed {
                    position: was_active,
                    length: true,
                }
            } else {
                HostEffect::Rejected("无法删除：下标越界".to_owned())
            }
        }
        HostCommand::List => HostEffect::Print(format_playlist(playlist)),
        HostCommand::Status => HostEffect::Status,
        HostCommand::Quit => HostEffect::Quit,
    }
}

pub fn format_playlist(playlist: &MemoryPlaylist) -> String {
    let active = playlist.active_position();
    playlist
        .entries()
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let marker = if active == Some(i) { '>' } else { ' ' };
            let kind = if is_remote(value) { "remote" } else { "local " };
            format!("{marker} {i:>3} [{kind}] {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_snapshot(snap: &PreloadSnapshot) -> String {
    let mut out = format!(
        "worker: {} | 队列: {} | pending: {} | 缓存: {}",
        if snap.busy { "busy" } else { "idle" },
        snap.queued.len(),
        snap.pending,
        snap.ledger.len()
    );
    for reference in &snap.queued {
        out.push_str(&format!("\n  queued {reference}"));
    }
    for path in &snap.ledger {
        out.push_str(&format!("\n  cached {path}"));
    }
    out
}

/// 读取播放列表文件：每行一个条目，忽略空行与 `#` 开头的注释
pub fn read_playlist_file(path: &Path) -> Result<Vec<String>, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Playlist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_owned)
        .collect())
}
