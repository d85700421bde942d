// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 文章（article）：一篇被抓取的文章记录
/// - 爬取状态（crawl_state）：一次运行中共享的去重集合与结果序列
pub mod article;
pub mod crawl_state;
