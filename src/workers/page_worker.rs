// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::models::crawl_state::CrawlState;
use crate::domain::services::link_harvester::{self, ClaimedLinks};
use crate::engines::throttle::Throttle;
use crate::engines::traits::{ScrapeRequest, ScraperEngine};
use crate::infrastructure::storage::DebugDump;
use crate::utils::text_encoding::decode_body;

/// 页面 URL 含有该片段时，解码后的内容写入调试文件
const DEBUG_DUMP_MARKER: &str = "search";

/// 页面队列工作者
///
/// 处理搜索页、列表页和分页，所有页面共用一个会话，
/// 并发数由信号量限制，相邻请求之间由节流器保持固定间隔。
pub struct PageWorker {
    engine: Arc<dyn ScraperEngine>,
    state: Arc<CrawlState>,
    permits: Arc<Semaphore>,
    throttle: Throttle,
    headers: HashMap<String, String>,
    allowed_hosts: Vec<String>,
    article_hosts: Vec<String>,
    timeout: Duration,
    keyword: String,
    debug_dump: DebugDump,
}

/// 页面工作者的请求参数
pub struct PageWorkerOptions {
    pub parallelism: usize,
    pub delay: Duration,
    pub headers: HashMap<String, String>,
    pub allowed_hosts: Vec<String>,
    /// 文章链接必须落在这些主机上才会被占用
    pub article_hosts: Vec<String>,
    pub timeout: Duration,
    pub debug_dump: DebugDump,
}

impl PageWorker {
    pub fn new(
        engine: Arc<dyn ScraperEngine>,
        state: Arc<CrawlState>,
        keyword: impl Into<String>,
        options: PageWorkerOptions,
    ) -> Self {
        Self {
            engine,
            state,
            permits: Arc::new(Semaphore::new(options.parallelism.max(1))),
            throttle: Throttle::new(options.delay),
            headers: options.headers,
            allowed_hosts: options.allowed_hosts,
            article_hosts: options.article_hosts,
            timeout: options.timeout,
            keyword: keyword.into(),
            debug_dump: options.debug_dump,
        }
    }

    fn build_request(&self, url: &str) -> ScrapeRequest {
        ScrapeRequest {
            url: url.to_string(),
            headers: self.headers.clone(),
            timeout: self.timeout,
            allowed_hosts: self.allowed_hosts.clone(),
            isolated_session: false,
        }
    }

    /// 访问一个页面并返回本次新占用的链接
    ///
    /// 请求失败只记录日志，返回空的链接集合。
    /// 站外的文章链接在占用之前被丢弃，分页只受 `2 × 目标数量` 的上限约束。
    #[instrument(skip(self), fields(engine = self.engine.name()))]
    pub async fn visit(&self, url: &str) -> ClaimedLinks {
        let Ok(_permit) = self.permits.acquire().await else {
            return ClaimedLinks::default();
        };
        self.throttle.wait_before_request().await;

        let response = match self.engine.scrape(&self.build_request(url)).await {
            Ok(response) => response,
            Err(e) => {
                warn!("请求错误: {}, 状态码: {}", url, e.status_code());
                if e.is_retryable() {
                    debug!("暂时性错误，页面不会重试: {}", e);
                } else {
                    debug!("请求失败原因: {}", e);
                }
                return ClaimedLinks::default();
            }
        };

        let body = decode_body(&response.body);
        if url.contains(DEBUG_DUMP_MARKER) {
            self.debug_dump.save(body.as_bytes()).await;
        }

        let page_url = match Url::parse(&response.url).or_else(|_| Url::parse(url)) {
            Ok(page_url) => page_url,
            Err(e) => {
                warn!("无法解析页面地址 {}: {}", url, e);
                return ClaimedLinks::default();
            }
        };

        let mut links = {
            let document = Html::parse_document(&body);
            link_harvester::harvest_page(&document, &page_url, &self.keyword)
        };
        links.retain_article_hosts(&self.article_hosts);
        link_harvester::claim_links(&self.state, links)
    }
}
