// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SiteSettings;
use crate::engines::traits::EngineError;
use crate::engines::validators;
use url::Url;

/// 站内搜索入口
///
/// 根据关键词构造搜索请求地址，作为一次爬取的起点。
#[derive(Debug, Clone)]
pub struct SiteSearch {
    base_url: String,
    search_id: String,
    allowed_hosts: Vec<String>,
}

impl SiteSearch {
    pub fn new(site: &SiteSettings) -> Self {
        let mut allowed_hosts = vec![site.target_host.clone()];
        allowed_hosts.extend(site.search_hosts.iter().cloned());
        Self {
            base_url: site.search_base_url.clone(),
            search_id: site.search_id.clone(),
            allowed_hosts,
        }
    }

    /// 搜索页及其后续页面允许访问的主机名
    pub fn allowed_hosts(&self) -> &[String] {
        &self.allowed_hosts
    }

    /// 构造搜索地址 `<base>?s=<id>&entry=1&q=<keyword>`
    ///
    /// 关键词按表单规则转义，地址必须落在允许的主机范围内。
    pub fn build_url(&self, keyword: &str) -> Result<Url, EngineError> {
        let query = serde_urlencoded::to_string([
            ("s", self.search_id.as_str()),
            ("entry", "1"),
            ("q", keyword),
        ])
        .map_err(|e| EngineError::InvalidUrl(e.to_string()))?;

        validators::validate_url(&format!("{}?{}", self.base_url, query), &self.allowed_hosts)
    }
}
