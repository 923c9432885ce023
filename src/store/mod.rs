//! 文件系统接口：存在性检查、尽力删除、目录创建与按模式清理

mod local;

pub use local::FsFileStore;

use std::path::Path;

pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// 尽力删除；返回是否删除成功
    fn delete(&self, path: &Path) -> bool;

    fn ensure_dir(&self, dir: &Path) -> std::io::Result<()>;

    /// 删除 `dir` 下文件名匹配 `pattern` 的文件（不递归），返回删除数量
    fn delete_by_pattern(&self, dir: &Path, pattern: &str) -> usize;
}
