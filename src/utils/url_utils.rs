// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path.trim())
}

/// 判断 URL 的主机名是否在允许列表中（忽略端口，大小写不敏感）
pub fn is_host_allowed(url: &Url, allowed_hosts: &[String]) -> bool {
    match url.host_str() {
        Some(host) => allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host)),
        None => false,
    }
}
