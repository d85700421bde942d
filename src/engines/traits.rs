// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 服务器返回了非成功状态码
    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    /// 目标主机不在允许列表中
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),
    /// URL 无法解析
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// 错误对应的 HTTP 状态码，没有响应时为 0
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::RequestFailed(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
            EngineError::HttpStatus { status, .. } => *status,
            _ => 0,
        }
    }
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// 目标URL
    pub url: String,
    /// 请求头（User-Agent 由引擎随机选择）
    pub headers: HashMap<String, String>,
    /// 超时时间
    pub timeout: Duration,
    /// 允许访问的主机名
    pub allowed_hosts: Vec<String>,
    /// 是否使用独立会话（新的客户端与 Cookie）
    pub isolated_session: bool,
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct ScrapeResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 最终地址（跟随重定向之后）
    pub url: String,
    /// 原始响应内容，尚未做编码转换
    pub body: Vec<u8>,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 抓取引擎特质
#[async_trait]
pub trait ScraperEngine: Send + Sync {
    /// 执行抓取
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
