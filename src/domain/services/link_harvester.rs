// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_state::CrawlState;
use crate::utils::url_utils;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::{debug, info};
use url::Url;

/// 链接文字被采用所需的最小长度（字符数，不含）
const MIN_LINK_TEXT_CHARS: usize = 5;

const NEXT_PAGE_TEXT: &str = "下一页";
const PAGINATION_HREF_MARKERS: &[&str] = &["page=", "list_"];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static DEMO_BOX: Lazy<Selector> = Lazy::new(|| Selector::parse("div.demo_box").unwrap());
static ARTICLE_LIST: Lazy<Selector> = Lazy::new(|| Selector::parse("div.articlelist").unwrap());
static PAGINATION: Lazy<Selector> = Lazy::new(|| Selector::parse("div.page").unwrap());

/// 文章链接的来源区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// `div.demo_box` 列表区域
    DemoBox,
    /// `div.articlelist` 列表区域
    ArticleList,
    /// 搜索页或关键词页面上的任意链接
    Generic,
}

impl LinkSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkSource::DemoBox => "demo_box",
            LinkSource::ArticleList => "articlelist",
            LinkSource::Generic => "通用",
        }
    }
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 候选文章链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    pub url: String,
    pub text: String,
    pub source: LinkSource,
}

/// 一个页面上发现的全部候选链接，按处理器顺序排列
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub articles: Vec<ArticleLink>,
    pub pagination: Vec<String>,
}

impl PageLinks {
    /// 只保留主机名在允许列表内的文章链接，分页链接不受影响
    pub fn retain_article_hosts(&mut self, allowed_hosts: &[String]) {
        self.articles.retain(|link| {
            let allowed = Url::parse(&link.url)
                .map(|url| url_utils::is_host_allowed(&url, allowed_hosts))
                .unwrap_or(false);
            if !allowed {
                debug!("跳过站外文章链接({}): {}", link.source, link.url);
            }
            allowed
        });
    }
}

/// 通过共享状态占用后的链接，调用方只需派发
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClaimedLinks {
    pub articles: Vec<ArticleLink>,
    pub pagination: Vec<String>,
}

impl ClaimedLinks {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.pagination.is_empty()
    }
}

/// 把 href 解析为去掉片段的 http(s) 绝对地址
fn absolute_url(base: &Url, href: &str) -> Option<String> {
    if href.starts_with('#') {
        return None;
    }
    let mut url = url_utils::resolve_url(base, href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

fn anchor_text(anchor: &ElementRef<'_>) -> String {
    anchor.text().collect::<String>().trim().to_string()
}

/// 扫描容器内的文章链接
///
/// 只接受以 `.htm` / `.html` 结尾、链接文字超过 5 个字符的链接。
/// 容器本身是 `<a>` 时也会被检查。
pub fn scan_article_anchors(
    container: ElementRef<'_>,
    base: &Url,
    source: LinkSource,
) -> Vec<ArticleLink> {
    let anchors: Vec<ElementRef<'_>> = if container.value().name() == "a" {
        vec![container]
    } else {
        container.select(&ANCHOR).collect()
    };

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href").unwrap_or_default();
            if !(href.ends_with(".htm") || href.ends_with(".html")) {
                return None;
            }
            let text = anchor_text(&anchor);
            if text.chars().count() <= MIN_LINK_TEXT_CHARS {
                return None;
            }
            let url = absolute_url(base, href)?;
            Some(ArticleLink { url, text, source })
        })
        .collect()
}

/// 扫描分页容器中的分页链接
pub fn scan_pagination(container: ElementRef<'_>, base: &Url) -> Vec<String> {
    container
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href").unwrap_or_default();
            let text = anchor_text(&anchor);
            let looks_like_page = text.contains(NEXT_PAGE_TEXT)
                || PAGINATION_HREF_MARKERS.iter().any(|m| href.contains(m));
            if !looks_like_page || href.contains('#') {
                return None;
            }
            absolute_url(base, href)
        })
        .collect()
}

/// 判断通用链接处理器是否作用于该页面
///
/// 页面 URL 含有 `search` 或搜索关键词时，页面上的所有链接都参与收集。
pub fn is_generic_page(page_url: &Url, keyword: &str) -> bool {
    let url = page_url.as_str();
    url.contains("search") || url.contains(keyword)
}

/// 对一个已解析页面运行全部链接处理器
pub fn harvest_page(document: &Html, page_url: &Url, keyword: &str) -> PageLinks {
    let mut links = PageLinks::default();

    for container in document.select(&DEMO_BOX) {
        links
            .articles
            .extend(scan_article_anchors(container, page_url, LinkSource::DemoBox));
    }

    for container in document.select(&ARTICLE_LIST) {
        links
            .articles
            .extend(scan_article_anchors(container, page_url, LinkSource::ArticleList));
    }

    if is_generic_page(page_url, keyword) {
        for anchor in document.select(&ANCHOR) {
            links
                .articles
                .extend(scan_article_anchors(anchor, page_url, LinkSource::Generic));
        }
    }

    for container in document.select(&PAGINATION) {
        links.pagination.extend(scan_pagination(container, page_url));
    }

    debug!(
        "{} 上发现 {} 个候选文章链接, {} 个候选分页链接",
        page_url,
        links.articles.len(),
        links.pagination.len()
    );
    links
}

/// 在共享状态中占用候选链接
///
/// 每个 URL 只会被占用一次；达到目标数量后不再占用新的文章链接，
/// 分页链接同时受 `2 × 目标数量` 的上限约束。
pub fn claim_links(state: &CrawlState, links: PageLinks) -> ClaimedLinks {
    let mut claimed = ClaimedLinks::default();

    for link in links.articles {
        if state.claim_article(&link.url) {
            info!("找到文章链接({}): {}, 标题: {}", link.source, link.url, link.text);
            claimed.articles.push(link);
        }
    }

    for url in links.pagination {
        if state.claim_pagination(&url) {
            info!("正在访问分页: {}", url);
            claimed.pagination.push(url);
        }
    }

    claimed
}
