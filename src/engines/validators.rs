// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::EngineError;
use crate::utils::url_utils;
use url::Url;

/// 验证 URL 是否允许抓取
///
/// 只接受 http/https，且主机名必须在允许列表中。允许列表为空时不做主机限制。
pub fn validate_url(url_str: &str, allowed_hosts: &[String]) -> Result<Url, EngineError> {
    let url = Url::parse(url_str)
        .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(EngineError::InvalidUrl(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }

    if !allowed_hosts.is_empty() && !url_utils::is_host_allowed(&url, allowed_hosts) {
        return Err(EngineError::DomainNotAllowed(
            url.host_str().unwrap_or_default().to_string(),
        ));
    }

    Ok(url)
}
