//! 标识字段格式规则。

use regex::Regex;
use std::sync::LazyLock;

static MAC_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").ok());

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").ok());

/// MAC 地址：六组十六进制，`:` 或 `-` 分隔。
pub fn is_valid_mac(value: &str) -> bool {
    MAC_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}
