//! 下载相关错误

/// 外部下载器错误类型
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// 启动下载进程失败
    #[error("启动下载器失败({program}): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// 下载进程非零退出
    #[error("下载器退出码 {}: {reference}", display_code(.code))]
    Exit { reference: String, code: Option<i32> },

    /// 下载进程结束但目标文件不存在
    #[error("下载完成但文件缺失: {0}")]
    MissingOutput(std::path::PathBuf),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "未知".to_owned(), |c| c.to_string())
}

impl FetchError {
    /// 下载器报告的退出码（若有）
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            FetchError::Exit { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Exit {
            reference: "https://example.com/v".to_owned(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "下载器退出码 1: https://example.com/v");
        assert_eq!(err.exit_code(), Some(1));

        let err = FetchError::Exit {
            reference: "https://example.com/v".to_owned(),
            code: None,
        };
        assert!(err.to_string().contains("未知"));
        assert_eq!(err.exit_code(), None);
    }
}
