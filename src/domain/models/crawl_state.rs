// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::Article;
use parking_lot::Mutex;
use std::collections::HashSet;

/// 一次爬取运行的共享状态
///
/// 由爬取管理器持有，通过 `Arc` 交给每个页面任务和文章任务。
/// 所有检查与修改都在同一把锁内完成，锁从不跨越 `.await`。
pub struct CrawlState {
    target: usize,
    inner: Mutex<CrawlStateInner>,
}

#[derive(Default)]
struct CrawlStateInner {
    visited_articles: HashSet<String>,
    visited_pages: HashSet<String>,
    pagination_enqueued: usize,
    articles: Vec<Article>,
}

impl CrawlState {
    /// 创建目标数量为 `target` 的共享状态
    pub fn new(target: usize) -> Self {
        Self {
            target,
            inner: Mutex::new(CrawlStateInner::default()),
        }
    }

    /// 分页 URL 的数量上限，为目标文章数的两倍
    pub fn pagination_limit(&self) -> usize {
        self.target.saturating_mul(2)
    }

    /// 尝试占用一个文章 URL
    ///
    /// URL 未访问过且结果数未达到目标时标记为已访问并返回 `true`，
    /// 调用方随后负责派发抓取任务。
    pub fn claim_article(&self, url: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.articles.len() >= self.target || inner.visited_articles.contains(url) {
            return false;
        }
        inner.visited_articles.insert(url.to_string())
    }

    /// 尝试占用一个列表/搜索页面 URL
    pub fn claim_page(&self, url: &str) -> bool {
        self.inner.lock().visited_pages.insert(url.to_string())
    }

    /// 尝试占用一个分页 URL
    ///
    /// 已达到目标数量、分页数已到上限或 URL 已访问时返回 `false`。
    pub fn claim_pagination(&self, url: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.articles.len() >= self.target
            || inner.pagination_enqueued >= self.pagination_limit()
            || inner.visited_pages.contains(url)
        {
            return false;
        }
        inner.visited_pages.insert(url.to_string());
        inner.pagination_enqueued += 1;
        true
    }

    /// 追加一篇文章
    ///
    /// 只接受满足阈值的文章，并在锁内重新检查结果数，
    /// 并发完成的任务因此不会让结果超过目标数量。
    pub fn push_article(&self, article: Article) -> bool {
        if !article.is_acceptable() {
            return false;
        }
        let mut inner = self.inner.lock();
        if inner.articles.len() >= self.target {
            return false;
        }
        inner.articles.push(article);
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.target
    }

    pub fn pages_visited(&self) -> usize {
        self.inner.lock().visited_pages.len()
    }

    pub fn pagination_enqueued(&self) -> usize {
        self.inner.lock().pagination_enqueued
    }

    pub fn articles_claimed(&self) -> usize {
        self.inner.lock().visited_articles.len()
    }

    /// 取出按完成顺序排列的结果
    pub fn take_articles(&self) -> Vec<Article> {
        std::mem::take(&mut self.inner.lock().articles)
    }
}
