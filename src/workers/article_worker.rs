// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::settings::Settings;
use crate::domain::models::article::Article;
use crate::domain::models::crawl_state::CrawlState;
use crate::domain::services::field_extractor::FieldExtractor;
use crate::engines::traits::{EngineError, ScrapeRequest, ScraperEngine};
use crate::utils::text_encoding::decode_body;

/// 预览日志中正文长度超过该值时在标题后加省略号
const PREVIEW_ELLIPSIS_CHARS: usize = 100;

/// 文章抓取工作者
///
/// 每个文章 URL 使用独立会话抓取，解析后把合格的结果追加到共享状态。
pub struct ArticleWorker {
    engine: Arc<dyn ScraperEngine>,
    extractor: Arc<FieldExtractor>,
    state: Arc<CrawlState>,
    headers: HashMap<String, String>,
    allowed_hosts: Vec<String>,
    timeout: Duration,
}

impl ArticleWorker {
    pub fn new(
        engine: Arc<dyn ScraperEngine>,
        extractor: Arc<FieldExtractor>,
        state: Arc<CrawlState>,
        settings: &Settings,
    ) -> Self {
        Self {
            engine,
            extractor,
            state,
            headers: settings.http.request_headers(),
            allowed_hosts: settings.allowed_article_hosts(),
            timeout: settings.request_timeout(),
        }
    }

    fn build_request(&self, url: &str) -> ScrapeRequest {
        ScrapeRequest {
            url: url.to_string(),
            headers: self.headers.clone(),
            timeout: self.timeout,
            allowed_hosts: self.allowed_hosts.clone(),
            isolated_session: true,
        }
    }

    /// 抓取并解析一篇文章
    ///
    /// 请求失败时只记录日志并返回 `None`，不会中断整个爬取。
    #[instrument(skip(self), fields(engine = self.engine.name()))]
    pub async fn fetch(&self, url: &str) -> Option<Article> {
        let response = match self.engine.scrape(&self.build_request(url)).await {
            Ok(response) => response,
            Err(EngineError::DomainNotAllowed(host)) => {
                debug!("跳过站外文章: {} ({})", url, host);
                return None;
            }
            Err(e) => {
                warn!("请求错误: {}, 状态码: {}", url, e.status_code());
                debug!("请求失败原因: {}", e);
                return None;
            }
        };

        let body = decode_body(&response.body);
        let document = Html::parse_document(&body);
        let article = self.extractor.extract(&document, url);
        log_preview(&article);
        Some(article)
    }

    /// 抓取一篇文章并尝试追加到结果序列，返回是否被接受
    pub async fn run(&self, url: &str) -> bool {
        match self.fetch(url).await {
            Some(article) => self.state.push_article(article),
            None => false,
        }
    }
}

fn log_preview(article: &Article) {
    let content_chars = article.content.chars().count();
    if content_chars > PREVIEW_ELLIPSIS_CHARS {
        info!("已爬取: {}... (内容长度: {})", article.title, content_chars);
    } else {
        info!("已爬取: {} (内容长度: {})", article.title, content_chars);
    }
}
