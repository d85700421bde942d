// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, ScrapeRequest, ScrapeResponse, ScraperEngine};
use crate::engines::user_agent::UserAgentPool;
use crate::engines::validators;
use crate::utils::url_utils;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 单个请求最多跟随的重定向次数
const MAX_REDIRECTS: usize = 10;

/// 抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎。共享会话按允许主机列表各建一个带 Cookie 的客户端，
/// 独立会话的请求每次新建客户端。重定向只会跟随到允许列表内的主机。
pub struct ReqwestEngine {
    timeout: Duration,
    shared_clients: Mutex<HashMap<Vec<String>, reqwest::Client>>,
    user_agents: UserAgentPool,
}

impl ReqwestEngine {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// * `timeout` - 共享客户端的请求超时
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        // 先构建一次，尽早暴露 TLS 等初始化错误
        Self::build_client(timeout, &[])?;
        Ok(Self {
            timeout,
            shared_clients: Mutex::new(HashMap::new()),
            user_agents: UserAgentPool::new(),
        })
    }

    pub fn with_user_agents(mut self, user_agents: UserAgentPool) -> Self {
        self.user_agents = user_agents;
        self
    }

    fn build_client(
        timeout: Duration,
        allowed_hosts: &[String],
    ) -> Result<reqwest::Client, EngineError> {
        Ok(reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .redirect(redirect_policy(allowed_hosts.to_vec()))
            .build()?)
    }

    /// 取得该允许列表对应的共享客户端，首次使用时创建
    fn shared_client(&self, allowed_hosts: &[String]) -> Result<reqwest::Client, EngineError> {
        let mut clients = self.shared_clients.lock();
        if let Some(client) = clients.get(allowed_hosts) {
            return Ok(client.clone());
        }
        let client = Self::build_client(self.timeout, allowed_hosts)?;
        clients.insert(allowed_hosts.to_vec(), client.clone());
        Ok(client)
    }

    fn build_headers(&self, request: &ScrapeRequest) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            if let (Ok(k), Ok(v)) = (
                HeaderName::from_bytes(k.as_bytes()),
                HeaderValue::from_str(v),
            ) {
                headers.insert(k, v);
            }
        }
        if let Ok(ua) = HeaderValue::from_str(self.user_agents.random()) {
            headers.insert(USER_AGENT, ua);
        }
        headers
    }
}

#[async_trait]
impl ScraperEngine for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResponse)` - 2xx 响应及其原始内容
    /// * `Err(EngineError)` - 主机不允许、传输失败或非成功状态码
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError> {
        let url = validators::validate_url(&request.url, &request.allowed_hosts)?;
        let headers = self.build_headers(request);

        let client = if request.isolated_session {
            Self::build_client(request.timeout, &request.allowed_hosts)?
        } else {
            self.shared_client(&request.allowed_hosts)?
        };

        let start = Instant::now();
        let response = client
            .get(url)
            .headers(headers)
            .timeout(request.timeout)
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        if response.status().is_redirection() {
            if let Some(target) = redirect_target(&response) {
                warn!("拒绝跟随站外重定向: {} -> {}", request.url, target);
                return Err(EngineError::DomainNotAllowed(
                    target.host_str().unwrap_or_default().to_string(),
                ));
            }
        }
        if !response.status().is_success() {
            return Err(EngineError::HttpStatus {
                url: request.url.clone(),
                status: status_code,
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("text/html")
            .to_string();

        let body = response.bytes().await?.to_vec();
        debug!("抓取完成: {} ({} 字节)", final_url, body.len());

        Ok(ScrapeResponse {
            status_code,
            url: final_url,
            body,
            content_type,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// 重定向策略：目标主机不在允许列表内时停止跟随，交由调用方处理 3xx 响应
fn redirect_policy(allowed_hosts: Vec<String>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if allowed_hosts.is_empty()
            || url_utils::is_host_allowed(attempt.url(), &allowed_hosts)
        {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}

fn redirect_target(response: &reqwest::Response) -> Option<url::Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    url_utils::resolve_url(response.url(), location).ok()
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
