// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use fanwen_crawler::config::settings::Settings;
use fanwen_crawler::domain::models::crawl_state::CrawlState;
use fanwen_crawler::domain::services::field_extractor::FieldExtractor;
use fanwen_crawler::domain::services::link_harvester::{claim_links, harvest_page};
use scraper::Html;
use url::Url;

fn extractor() -> FieldExtractor {
    FieldExtractor::new(Settings::defaults().unwrap().site.title_suffixes)
}

#[test]
fn test_title_falls_back_to_page_title_without_site_suffix() {
    let doc = Html::parse_document(
        "<html><head><title>范文标题 - 第一范文网</title></head><body><p>正文</p></body></html>",
    );
    assert_eq!(extractor().extract_title(&doc), "范文标题");
}

#[test]
fn test_accepted_articles_satisfy_thresholds() {
    let pages = [
        "<html><head><title>标题</title></head><body><div class=\"content\">这是一篇足够长的正文，内容超过二十个字符。</div></body></html>",
        "<html><head><title></title></head><body><div class=\"content\">这是一篇足够长的正文，内容超过二十个字符。</div></body></html>",
        "<html><head><title>标题</title></head><body><div class=\"content\">短</div></body></html>",
    ];
    let state = CrawlState::new(10);
    for (i, page) in pages.iter().enumerate() {
        let doc = Html::parse_document(page);
        state.push_article(extractor().extract(&doc, &format!("http://x/{i}")));
    }
    let articles = state.take_articles();
    assert_eq!(articles.len(), 1);
    for article in articles {
        assert!(!article.title.trim().is_empty());
        assert!(article.content.chars().count() > 20);
    }
}

#[test]
fn test_n_distinct_links_with_duplicates_claim_n() {
    let distinct = 7;
    let anchors: String = (0..distinct)
        .chain(0..3)
        .map(|i| format!(r#"<a href="/a/{i}.html">第{i}篇文章的标题</a>"#))
        .collect();
    let html = format!(
        r#"<div class="demo_box">{anchors}</div><div class="articlelist">{anchors}</div>"#
    );
    let doc = Html::parse_document(&html);
    let page = Url::parse("http://www.diyifanwen.com/list_1.html").unwrap();
    let state = CrawlState::new(100);
    let claimed = claim_links(&state, harvest_page(&doc, &page, "kw"));
    assert_eq!(claimed.articles.len(), distinct);
}
