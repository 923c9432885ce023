use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::domain::trust::DEFAULT_TRUSTED_DOMAINS;
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreloadSettings {
    // 下载目标
    /// 缓存目录；None 时使用 `{data_dir}/cache`
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    // 下载器
    #[serde(default = "default_ytdl_path")]
    pub ytdl_path: PathBuf,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub extra_option_1: Option<String>,
    #[serde(default)]
    pub extra_option_2: Option<String>,
    #[serde(default = "default_trusted_domains")]
    pub trusted_domains: Vec<String>,

    // 预载窗口与缓存上限
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            download_dir: None,
            file_extension: default_file_extension(),
            ytdl_path: default_ytdl_path(),
            format: default_format(),
            extra_option_1: None,
            extra_option_2: None,
            trusted_domains: default_trusted_domains(),
            limit: default_limit(),
        }
    }
}

impl PreloadSettings {
    /// 实际使用的缓存目录
    pub fn resolve_download_dir(&self, data_dir: &Path) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("cache"))
    }

    /// 非空的透传选项；只有两个配置项，因此最多两个，空白项被丢弃
    pub fn extra_options(&self) -> Vec<String> {
        [&self.extra_option_1, &self.extra_option_2]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect()
    }
}

// 默认值函数（用于 serde default）
fn default_file_extension() -> String { "mkv".to_owned() }
fn default_ytdl_path() -> PathBuf { PathBuf::from("yt-dlp") }
fn default_format() -> String { "bv*+ba/b".to_owned() }
fn default_trusted_domains() -> Vec<String> {
    DEFAULT_TRUSTED_DOMAINS.iter().map(|d| (*d).to_owned()).collect()
}
fn default_limit() -> usize { 5 }

pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("dev", "ytdl-preload", "ytdl-preload")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("ytdl-preload"))
}

/// 读取设置；文件缺失或损坏时回退默认值
pub fn load_settings(data_dir: &Path) -> PreloadSettings {
    let p = settings_path(data_dir);
    let Ok(bytes) = fs::read(&p) else {
        return PreloadSettings::default();
    };
    match serde_json::from_slice(&bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %p.display(), err = %e, "解析设置失败，使用默认值");
            PreloadSettings::default()
        }
    }
}

pub fn save_settings(data_dir: &Path, s: &PreloadSettings) -> Result<(), SettingsError> {
    let p = settings_path(data_dir);
    let save_err = |source: std::io::Error| SettingsError::Save {
        path: p.clone(),
        source,
    };
    fs::create_dir_all(data_dir).map_err(save_err)?;
    let bytes =
        serde_json::to_vec_pretty(s).map_err(|source| SettingsError::Serialize { source })?;
    let mut tmp = NamedTempFile::new_in(data_dir).map_err(save_err)?;
    tmp.write_all(&bytes).map_err(save_err)?;
    tmp.persist(&p).map_err(|e| save_err(e.error))?;
    Ok(())
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}
