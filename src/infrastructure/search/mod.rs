// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索服务模块
///
/// 目标站点使用的站内搜索入口
pub mod site_search;

pub use site_search::SiteSearch;
