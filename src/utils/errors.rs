// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 爬取流程错误类型
///
/// 页面和文章请求的失败只记录日志，不会出现在这里。
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 搜索入口请求无法派发，本次运行不产生任何输出
    #[error("搜索请求无法派发: {0}")]
    SeedDispatch(String),
}
