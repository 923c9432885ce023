//! 远程引用 → 本地缓存文件名
//!
//! 文件名格式 `preload-<len>-<fingerprint>.<ext>`：`len` 为引用的字节长度，
//! `fingerprint` 为 MD5 摘要前 8 字节（64 位）的十六进制。只作去重键使用。

use md5::{Digest, Md5};

/// 缓存文件名前缀
pub const CACHE_FILE_PREFIX: &str = "preload-";

/// 退出清理时匹配全部缓存文件的模式
pub const CACHE_FILE_PATTERN: &str = "preload-*";

/// 为远程引用生成稳定的缓存文件名
pub fn derive_file_name(reference: &str, ext: &str) -> String {
    let digest = Md5::digest(reference.as_bytes());
    let fingerprint = hex::encode(&digest[..8]);
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() {
        format!("{CACHE_FILE_PREFIX}{}-{fingerprint}", reference.len())
    } else {
        format!("{CACHE_FILE_PREFIX}{}-{fingerprint}.{ext}", reference.len())
    }
}
