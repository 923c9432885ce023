use super::reference::host_of;

/// 默认允许放宽扩展名检查的站点
pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &["youtube.com", "youtu.be", "vimeo.com"];

/// 来源白名单：命中的引用在下载时附加放宽扩展名的选项
#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    domains: Vec<String>,
}

impl TrustPolicy {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// 主机名等于白名单域名，或为其子域名
    pub fn is_trusted(&self, reference: &str) -> bool {
        let Some(host) = host_of(reference) else {
            return false;
        };
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}
