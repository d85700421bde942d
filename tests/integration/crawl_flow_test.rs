// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{article_page, gbk, test_settings};
use fanwen_crawler::engines::reqwest_engine::ReqwestEngine;
use fanwen_crawler::infrastructure::storage::{output_path, CsvExporter};
use fanwen_crawler::workers::manager::CrawlManager;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEYWORD: &str = "工作总结";

const SEARCH_PAGE: &str = r#"<html><body>
  <div class="demo_box">
    <a href="/fanwen/1.htm">第一篇工作总结范文</a>
    <a href="/fanwen/2.htm">第二篇工作总结范文</a>
    <a href="/fanwen/1.htm">第一篇工作总结范文</a>
    <a href="/fanwen/short.htm">短</a>
  </div>
  <div class="page"><a href="/fanwen/list_2.html">下一页</a></div>
</body></html>"#;

const LIST_PAGE_2: &str = r#"<html><body>
  <div class="articlelist">
    <a href="/fanwen/3.htm">第三篇工作总结范文</a>
    <a href="/fanwen/4.htm">第四篇工作总结范文</a>
    <a href="/fanwen/2.htm">第二篇工作总结范文</a>
  </div>
  <div class="page"><a href="/fanwen/list_3.html">下一页</a></div>
</body></html>"#;

const LIST_PAGE_3: &str = r#"<html><body>
  <div class="articlelist"><a href="/fanwen/5.htm">第五篇工作总结范文</a></div>
  <div class="page"><a href="/fanwen/list_4.html">下一页</a></div>
</body></html>"#;

const LIST_PAGE_4: &str = r#"<html><body>
  <div class="articlelist"><a href="/fanwen/6.htm">第六篇工作总结范文</a></div>
</body></html>"#;

const LONG_CONTENT: &str = "这是一篇用于测试的工作总结正文，内容长度足够通过正文长度的检查。";

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=gbk")
                .set_body_bytes(gbk(html)),
        )
        .mount(server)
        .await;
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cse/search"))
        .and(query_param("q", KEYWORD))
        .and(query_param("entry", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gbk(SEARCH_PAGE)))
        .expect(1)
        .mount(server)
        .await;

    mount_html(server, "/fanwen/list_2.html", LIST_PAGE_2).await;
    mount_html(server, "/fanwen/list_3.html", LIST_PAGE_3).await;
    Mock::given(method("GET"))
        .and(path("/fanwen/list_4.html"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gbk(LIST_PAGE_4)))
        .expect(1)
        .mount(server)
        .await;

    for (route, title) in [
        ("/fanwen/1.htm", "第一篇工作总结范文"),
        ("/fanwen/2.htm", "第二篇工作总结范文"),
        ("/fanwen/3.htm", "第三篇工作总结范文"),
        ("/fanwen/6.htm", "第六篇工作总结范文"),
    ] {
        mount_html(server, route, &article_page(title, LONG_CONTENT)).await;
    }
    mount_html(server, "/fanwen/4.htm", &article_page("第四篇工作总结范文", "太短")).await;
    // 5.htm 未挂载，返回 404
}

#[tokio::test]
async fn test_crawl_collects_articles_and_writes_csv() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&format!("{}/cse/search", server.uri()), dir.path());

    let engine = ReqwestEngine::new(Duration::from_secs(5)).unwrap();
    let manager = CrawlManager::new(Arc::new(engine), settings);
    let report = manager.run(KEYWORD, 10).await.unwrap();

    // 分页链一直跟到没有下一页为止
    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.articles_dispatched, 6);

    let titles: HashSet<&str> = report.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        HashSet::from([
            "第一篇工作总结范文",
            "第二篇工作总结范文",
            "第三篇工作总结范文",
            "第六篇工作总结范文",
        ])
    );
    for article in &report.articles {
        assert_eq!(article.publish_time, "2023-05-06");
        assert!(article.content.chars().count() > 20);
        assert!(article.url.starts_with(&server.uri()));
    }

    let debug_dump = dir.path().join("search_result.html");
    assert!(std::fs::read_to_string(debug_dump).unwrap().contains("demo_box"));

    let csv_path = output_path(dir.path(), KEYWORD);
    let written = CsvExporter::new(&csv_path).export(&report.articles).unwrap();
    assert_eq!(written, 4);
    let bytes = std::fs::read(&csv_path).unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "标题,发布时间,内容,URL");
    assert!(lines[1..].iter().all(|l| l.contains("，")));
}

#[tokio::test]
async fn test_crawl_stops_at_target() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&format!("{}/cse/search", server.uri()), dir.path());

    let engine = ReqwestEngine::new(Duration::from_secs(5)).unwrap();
    let report = CrawlManager::new(Arc::new(engine), settings)
        .run(KEYWORD, 2)
        .await
        .unwrap();

    assert_eq!(report.articles.len(), 2);
    let urls: HashSet<&str> = report.articles.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(urls.len(), 2);
}

#[tokio::test]
async fn test_failed_search_request_produces_no_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cse/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&format!("{}/cse/search", server.uri()), dir.path());

    let engine = ReqwestEngine::new(Duration::from_secs(5)).unwrap();
    let report = CrawlManager::new(Arc::new(engine), settings)
        .run(KEYWORD, 5)
        .await
        .unwrap();

    assert!(report.articles.is_empty());
    assert_eq!(report.articles_dispatched, 0);
    assert!(!dir.path().join("search_result.html").exists());
}
