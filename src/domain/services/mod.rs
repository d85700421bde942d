// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 字段提取（field_extractor）：按优先级的选择器策略提取标题、时间和正文
/// - 链接收集（link_harvester）：从列表、搜索和分页页面收集并占用链接
pub mod field_extractor;
pub mod link_harvester;
