// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 页面队列和文章队列的任务执行，以及驱动两者的爬取管理器
pub mod article_worker;
pub mod manager;
pub mod page_worker;
