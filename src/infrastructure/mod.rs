// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 搜索（search）：站内搜索入口地址的构造
/// - 存储（storage）：CSV 输出和调试页面转储
pub mod search;
pub mod storage;
