// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::{Article, MIN_CONTENT_CHARS};
use crate::utils::text_cleaner::clean_content;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

/// 一个提取策略：从已解析的文档得到可选的字段值
pub type Strategy = Box<dyn Fn(&Html) -> Option<String> + Send + Sync>;

/// 段落被采用所需的最小长度（字符数，不含）
const MIN_PARAGRAPH_CHARS: usize = 5;

const TITLE_SELECTORS: &[&str] = &["h1", "h2", ".title", ".article-title"];

const PUBLISH_TIME_SELECTORS: &[&str] = &[
    ".info time",
    ".info .time",
    ".info span",
    ".article-meta time",
    ".pubtime",
    ".publish-time",
    ".time",
    ".date",
];

const CONTENT_SELECTORS: &[&str] = &[
    ".content",
    ".article-content",
    ".content-box",
    ".article-body",
    ".text",
    "#content",
    "#article-content",
    "#article_body",
    ".neirong",
    ".articleText",
    ".main-text",
    ".article-main",
];

const PUBLISH_TIME_LABELS: &[&str] = &["发布时间：", "发表时间："];

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}[-/][0-9]{1,2}[-/][0-9]{1,2}").unwrap());

static TITLE_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static ARTICLE_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static PARAGRAPH_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

fn parse_selectors(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
}

/// 选择器文本：所有匹配元素的文本依次拼接后去除首尾空白
pub fn selector_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// 按顺序尝试策略，返回第一个有结果的值
pub fn cascade(document: &Html, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(document))
}

fn non_empty(selector: Selector) -> Strategy {
    Box::new(move |document: &Html| {
        Some(selector_text(document, &selector)).filter(|t| !t.is_empty())
    })
}

fn longer_than(selector: Selector, min_chars: usize) -> Strategy {
    Box::new(move |document: &Html| {
        Some(selector_text(document, &selector))
            .filter(|t| t.chars().count() > min_chars)
            .map(|t| clean_content(&t))
    })
}

/// 文章字段提取器
///
/// 标题、发布时间和正文各自是一组按优先级排列的策略，
/// 依次尝试直到某个策略给出合格的结果。提取从不失败，
/// 找不到的字段退化为空字符串。
pub struct FieldExtractor {
    title: Vec<Strategy>,
    publish_time: Vec<Strategy>,
    content: Vec<Strategy>,
}

impl FieldExtractor {
    /// 创建提取器
    ///
    /// # 参数
    ///
    /// * `title_suffixes` - 使用 `<title>` 兜底时需要去除的站点后缀
    pub fn new(title_suffixes: Vec<String>) -> Self {
        let mut title: Vec<Strategy> = parse_selectors(TITLE_SELECTORS)
            .into_iter()
            .map(non_empty)
            .collect();
        title.push(Box::new(move |document: &Html| {
            let mut page_title = selector_text(document, &TITLE_TAG);
            for suffix in &title_suffixes {
                page_title = page_title.replacen(suffix.as_str(), "", 1);
            }
            Some(page_title)
        }));

        let publish_time = parse_selectors(PUBLISH_TIME_SELECTORS)
            .into_iter()
            .map(non_empty)
            .collect();

        let mut content: Vec<Strategy> = parse_selectors(CONTENT_SELECTORS)
            .into_iter()
            .map(|selector| longer_than(selector, MIN_CONTENT_CHARS))
            .collect();
        content.push(longer_than(ARTICLE_TAG.clone(), MIN_CONTENT_CHARS));
        content.push(Box::new(|document: &Html| {
            let paragraphs: Vec<String> = document
                .select(&PARAGRAPH_TAG)
                .map(|p| p.text().collect::<String>().trim().to_string())
                .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
                .collect();
            Some(clean_content(&paragraphs.join("\n\n")))
        }));

        Self {
            title,
            publish_time,
            content,
        }
    }

    pub fn extract_title(&self, document: &Html) -> String {
        cascade(document, &self.title)
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    pub fn extract_publish_time(&self, document: &Html) -> String {
        match cascade(document, &self.publish_time) {
            Some(raw) => normalize_publish_time(&raw),
            None => String::new(),
        }
    }

    pub fn extract_content(&self, document: &Html) -> String {
        cascade(document, &self.content).unwrap_or_default()
    }

    /// 从文章页面提取全部字段
    pub fn extract(&self, document: &Html, url: &str) -> Article {
        Article {
            title: self.extract_title(document),
            publish_time: self.extract_publish_time(document),
            content: self.extract_content(document),
            url: url.to_string(),
        }
    }
}

/// 去掉时间标签前缀，能识别出日期时只保留日期
pub fn normalize_publish_time(raw: &str) -> String {
    let mut text = raw.to_string();
    for label in PUBLISH_TIME_LABELS {
        text = text.replace(label, "");
    }
    let text = text.trim();
    match DATE_REGEX.find(text) {
        Some(date) => date.as_str().to_string(),
        None => text.to_string(),
    }
}
