//! 播放列表条目分类：远程引用 vs 本地路径

/// 条目是否为远程引用（`<scheme>://...`，`file://` 视为本地）
pub fn is_remote(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return false;
    }
    !rest.is_empty() && !scheme.eq_ignore_ascii_case("file")
}

/// 提取远程引用的主机名（小写，去掉 userinfo 与端口）
pub fn host_of(reference: &str) -> Option<String> {
    let (_, rest) = reference.split_once("://")?;
    let authority = rest
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = if let Some(stripped) = host_port.strip_prefix('[') {
        // IPv6 字面量
        stripped.split(']').next().unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}
