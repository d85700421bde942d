// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含目标站点、爬取并发、HTTP 请求和输出等配置项。
/// 搜索关键词与文章数量不在此处，由启动时的交互输入提供。
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 目标站点配置
    pub site: SiteSettings,
    /// 爬取控制配置
    pub crawler: CrawlerSettings,
    /// HTTP 请求配置
    pub http: HttpSettings,
    /// 输出配置
    pub output: OutputSettings,
}

/// 目标站点配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    /// 唯一允许抓取文章的站点主机名
    pub target_host: String,
    /// 站内搜索入口地址（不含查询参数）
    pub search_base_url: String,
    /// 站内搜索引擎 ID（查询参数 `s`）
    pub search_id: String,
    /// 搜索入口使用的额外主机名
    pub search_hosts: Vec<String>,
    /// 页面 `<title>` 中需要去除的站点后缀，按顺序各去除一次
    pub title_suffixes: Vec<String>,
}

/// 爬取控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 列表/搜索/分页页面的最大并发数
    pub parallelism: usize,
    /// 相邻页面请求之间的固定间隔（毫秒）
    pub delay_ms: u64,
    /// 文章抓取任务的最大并发数
    pub article_concurrency: usize,
}

/// HTTP 请求配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// Accept 请求头
    pub accept: String,
    /// Accept-Language 请求头
    pub accept_language: String,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// CSV 文件所在目录
    pub directory: PathBuf,
    /// 搜索结果页调试文件名
    pub debug_dump: PathBuf,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 以及 `FANWEN__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("FANWEN").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 仅使用内置默认值构建配置，不读取文件和环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Default site settings
            .set_default("site.target_host", "www.diyifanwen.com")?
            .set_default("site.search_base_url", "https://zhannei.baidu.com/cse/search")?
            .set_default("site.search_id", "15991277701392786341")?
            .set_default("site.search_hosts", vec!["zhannei.baidu.com", "www.baidu.com"])?
            .set_default(
                "site.title_suffixes",
                vec![" - 第一范文网", "_第一范文网", "_第一范文", " - 第一范文"],
            )?
            // Default crawler settings
            .set_default("crawler.parallelism", 3)?
            .set_default("crawler.delay_ms", 2000)?
            .set_default("crawler.article_concurrency", 8)?
            // Default HTTP settings
            .set_default("http.timeout_secs", 30)?
            .set_default(
                "http.accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            )?
            .set_default("http.accept_language", "zh-CN,zh;q=0.9")?
            // Default output settings
            .set_default("output.directory", ".")?
            .set_default("output.debug_dump", "search_result.html")
    }

    /// 文章抓取只允许目标站点
    pub fn allowed_article_hosts(&self) -> Vec<String> {
        vec![self.site.target_host.clone()]
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

impl HttpSettings {
    /// 每个请求携带的固定请求头，User-Agent 由引擎另行随机选择
    pub fn request_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            ("Accept".to_string(), self.accept.clone()),
            ("Accept-Language".to_string(), self.accept_language.clone()),
            ("Connection".to_string(), "keep-alive".to_string()),
            ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
        ])
    }
}
