// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：文章与共享爬取状态
/// - 服务（services）：字段提取与链接收集等纯函数逻辑
///
/// 领域层不发起网络请求，只处理已解析的页面和共享状态。
pub mod models;
pub mod services;
