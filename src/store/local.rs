use std::fs;
use std::path::Path;

use super::FileStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileStore;

impl FileStore for FsFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), err = %e, "删除缓存文件失败");
                false
            }
        }
    }

    fn ensure_dir(&self, dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn delete_by_pattern(&self, dir: &Path, pattern: &str) -> usize {
        let pattern = match glob::Pattern::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(pattern, err = %e, "清理模式无效");
                return 0;
            }
        };

        let Ok(rd) = fs::read_dir(dir) else {
            return 0;
        };

        let mut removed = 0usize;
        for ent in rd.flatten() {
            let p = ent.path();
            if p.is_dir() {
                continue;
            }
            let matched = p
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.matches(n));
            if !matched {
                continue;
            }
            if self.delete(&p) {
                removed += 1;
            }
        }
        removed
    }
}
