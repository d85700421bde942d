// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含文章模型、爬取状态以及字段提取和链接收集服务
pub mod domain;

/// 引擎模块
///
/// 实现 HTTP 抓取引擎、请求节流和 User-Agent 轮换
pub mod engines;

/// 基础设施模块
///
/// 提供站内搜索入口和 CSV 输出
pub mod infrastructure;

/// 工具模块
///
/// 提供编码转换、正文清理、URL 处理和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现页面队列、文章抓取和爬取管理
pub mod workers;
