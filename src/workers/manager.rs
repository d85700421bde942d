// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::config::settings::Settings;
use crate::domain::models::article::Article;
use crate::domain::models::crawl_state::CrawlState;
use crate::domain::services::field_extractor::FieldExtractor;
use crate::domain::services::link_harvester::ClaimedLinks;
use crate::engines::traits::ScraperEngine;
use crate::infrastructure::search::site_search::SiteSearch;
use crate::infrastructure::storage::DebugDump;
use crate::utils::errors::CrawlError;
use crate::workers::article_worker::ArticleWorker;
use crate::workers::page_worker::{PageWorker, PageWorkerOptions};

/// 一次爬取的结果
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// 按完成顺序排列的合格文章，数量不超过目标
    pub articles: Vec<Article>,
    /// 访问过的搜索/列表/分页页面数
    pub pages_visited: usize,
    /// 派发的文章抓取任务数
    pub articles_dispatched: usize,
}

/// 爬取管理器
///
/// 从站内搜索开始驱动页面队列和文章队列，
/// 两个队列都清空后返回收集到的文章。
pub struct CrawlManager {
    engine: Arc<dyn ScraperEngine>,
    extractor: Arc<FieldExtractor>,
    search: SiteSearch,
    settings: Settings,
}

impl CrawlManager {
    pub fn new(engine: Arc<dyn ScraperEngine>, settings: Settings) -> Self {
        Self {
            extractor: Arc::new(FieldExtractor::new(settings.site.title_suffixes.clone())),
            search: SiteSearch::new(&settings.site),
            engine,
            settings,
        }
    }

    fn page_worker(&self, state: Arc<CrawlState>, keyword: &str) -> PageWorker {
        PageWorker::new(
            self.engine.clone(),
            state,
            keyword,
            PageWorkerOptions {
                parallelism: self.settings.crawler.parallelism,
                delay: self.settings.request_delay(),
                headers: self.settings.http.request_headers(),
                allowed_hosts: self.search.allowed_hosts().to_vec(),
                article_hosts: self.settings.allowed_article_hosts(),
                timeout: self.settings.request_timeout(),
                debug_dump: DebugDump::new(
                    self.settings
                        .output
                        .directory
                        .join(&self.settings.output.debug_dump),
                ),
            },
        )
    }

    /// 执行一次完整的爬取
    ///
    /// # 参数
    ///
    /// * `keyword` - 搜索关键词
    /// * `target` - 需要的文章数量
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlReport)` - 所有任务完成后的结果，文章数可能少于目标
    /// * `Err(CrawlError::SeedDispatch)` - 搜索请求无法派发
    #[instrument(skip(self))]
    pub async fn run(&self, keyword: &str, target: usize) -> Result<CrawlReport, CrawlError> {
        let seed = self
            .search
            .build_url(keyword)
            .map_err(|e| CrawlError::SeedDispatch(e.to_string()))?;

        let state = Arc::new(CrawlState::new(target));
        let page_worker = Arc::new(self.page_worker(state.clone(), keyword));
        let article_worker = Arc::new(ArticleWorker::new(
            self.engine.clone(),
            self.extractor.clone(),
            state.clone(),
            &self.settings,
        ));
        let article_permits = Arc::new(Semaphore::new(
            self.settings.crawler.article_concurrency.max(1),
        ));

        let mut pages: JoinSet<ClaimedLinks> = JoinSet::new();
        let mut articles: JoinSet<bool> = JoinSet::new();
        let mut dispatched = 0usize;

        info!("开始爬取: {}", seed);
        state.claim_page(seed.as_str());
        spawn_page(&mut pages, &page_worker, seed.to_string());

        loop {
            tokio::select! {
                Some(joined) = pages.join_next() => {
                    let claimed = match joined {
                        Ok(result) => result,
                        Err(e) => {
                            error!("页面任务异常退出: {}", e);
                            continue;
                        }
                    };
                    for link in claimed.articles {
                        dispatched += 1;
                        let worker = article_worker.clone();
                        let permits = article_permits.clone();
                        articles.spawn(async move {
                            let Ok(_permit) = permits.acquire_owned().await else {
                                return false;
                            };
                            worker.run(&link.url).await
                        });
                    }
                    for url in claimed.pagination {
                        spawn_page(&mut pages, &page_worker, url);
                    }
                }
                Some(joined) = articles.join_next() => {
                    match joined {
                        Ok(accepted) => debug!("文章任务完成, 已接受: {}", accepted),
                        Err(e) => error!("文章任务异常退出: {}", e),
                    }
                }
                else => break,
            }
        }

        let report = CrawlReport {
            articles: state.take_articles(),
            pages_visited: state.pages_visited(),
            articles_dispatched: dispatched,
        };
        info!(
            "爬取结束: 访问页面 {} 个, 派发文章 {} 篇, 收集文章 {} 篇",
            report.pages_visited,
            report.articles_dispatched,
            report.articles.len()
        );
        Ok(report)
    }
}

fn spawn_page(pages: &mut JoinSet<ClaimedLinks>, worker: &Arc<PageWorker>, url: String) {
    let worker = worker.clone();
    pages.spawn(async move { worker.visit(&url).await });
}
