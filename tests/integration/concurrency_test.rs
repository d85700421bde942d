// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{article_page, test_settings, FakeSite};
use fanwen_crawler::workers::manager::CrawlManager;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SEARCH_BASE: &str = "http://127.0.0.1/cse/search";

fn is_article(url: &str) -> bool {
    url.contains("/fanwen/") && url.ends_with(".htm")
}

/// 搜索页列出 `count` 篇文章，每个链接重复出现两次
fn search_page(count: usize) -> String {
    let anchors: String = (0..count)
        .map(|i| format!(r#"<a href="/fanwen/{i}.htm">第{i}篇测试范文标题</a>"#))
        .collect();
    format!(r#"<html><body><div class="demo_box">{anchors}{anchors}</div></body></html>"#)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_completion_never_overshoots_target() {
    let site = Arc::new(FakeSite::new(|url| {
        if url.starts_with(SEARCH_BASE) {
            Some(search_page(60))
        } else if is_article(url) {
            Some(article_page("并发测试范文", "这是一段足够长的正文内容，用来通过正文长度的检查。"))
        } else {
            None
        }
    }));
    let dir = tempfile::tempdir().unwrap();
    let mut settings = test_settings(SEARCH_BASE, dir.path());
    settings.crawler.article_concurrency = 32;

    let report = CrawlManager::new(site.clone(), settings)
        .run("并发", 5)
        .await
        .unwrap();

    assert_eq!(report.articles.len(), 5);
    let urls: HashSet<&str> = report.articles.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(urls.len(), 5);
    assert!(report.articles_dispatched >= 5);
}

#[tokio::test]
async fn test_duplicate_links_are_fetched_once() {
    let site = Arc::new(FakeSite::new(|url| {
        if url.starts_with(SEARCH_BASE) {
            Some(search_page(8))
        } else if is_article(url) {
            Some(article_page("去重测试", "太短"))
        } else {
            None
        }
    }));
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(SEARCH_BASE, dir.path());

    let report = CrawlManager::new(site.clone(), settings)
        .run("去重", 100)
        .await
        .unwrap();

    assert!(report.articles.is_empty());
    assert_eq!(report.articles_dispatched, 8);
    let counts = site.request_counts();
    let article_requests: Vec<usize> = counts
        .iter()
        .filter(|(url, _)| is_article(url))
        .map(|(_, n)| *n)
        .collect();
    assert_eq!(article_requests.len(), 8);
    assert!(article_requests.iter().all(|n| *n == 1));
}

#[tokio::test]
async fn test_pagination_bounded_by_twice_target() {
    // 每个列表页都给出 20 个新的分页链接，且没有任何文章
    let next_page = AtomicUsize::new(0);
    let site = Arc::new(FakeSite::new(move |_url| {
        let anchors: String = (0..20)
            .map(|_| {
                let n = next_page.fetch_add(1, Ordering::SeqCst);
                format!(r#"<a href="/list_{n}.html">{n}</a>"#)
            })
            .collect();
        Some(format!(
            r#"<html><body><div class="page">{anchors}</div></body></html>"#
        ))
    }));
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(SEARCH_BASE, dir.path());

    let report = CrawlManager::new(site.clone(), settings)
        .run("分页", 2)
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 1 + 4);
    assert_eq!(site.requests.lock().len(), 5);
    assert_eq!(report.articles_dispatched, 0);
}

#[tokio::test]
async fn test_long_pagination_chain_is_followed_until_target() {
    // 每个列表页只有一篇文章和一个指向下一页的链接
    let site = Arc::new(FakeSite::new(|url| {
        if url.starts_with(SEARCH_BASE) {
            return Some(chain_page(0));
        }
        if is_article(url) {
            return Some(article_page("分页链范文", "这是一段足够长的正文内容，用来通过正文长度的检查。"));
        }
        let n: usize = url
            .strip_prefix("http://127.0.0.1/fanwen/list_")?
            .strip_suffix(".html")?
            .parse()
            .ok()?;
        Some(chain_page(n))
    }));
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(SEARCH_BASE, dir.path());

    let report = CrawlManager::new(site.clone(), settings)
        .run("分页链", 8)
        .await
        .unwrap();

    assert_eq!(report.articles.len(), 8);
    // 搜索页加上至少 7 个列表页，远超原先的三层
    assert!(report.pages_visited >= 8);
    assert!(report.pages_visited <= 1 + 16);
}

fn chain_page(n: usize) -> String {
    let next = n + 1;
    format!(
        r#"<html><body>
        <div class="articlelist"><a href="/fanwen/{n}.htm">第{n}篇分页链测试范文</a></div>
        <div class="page"><a href="/fanwen/list_{next}.html">下一页</a></div>
        </body></html>"#
    )
}
