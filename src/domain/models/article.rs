// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 文章被接受所需的最小正文长度（字符数，不含）
pub const MIN_CONTENT_CHARS: usize = 20;

/// 文章实体
///
/// 一篇被抓取的文章页面。`url` 是文章的唯一标识，
/// 同一个 URL 在一次运行中最多产生一条记录。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// 文章标题
    pub title: String,
    /// 发布时间，尽力提取，可能为空
    pub publish_time: String,
    /// 清理后的正文
    pub content: String,
    /// 文章的绝对 URL
    pub url: String,
}

impl Article {
    /// 创建一个只带 URL 的空文章，字段由抓取任务填充
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 标题非空且正文超过阈值时才会被保存
    pub fn is_acceptable(&self) -> bool {
        !self.title.trim().is_empty() && self.content.chars().count() > MIN_CONTENT_CHARS
    }
}
