// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：请求、结果和流事件
/// - 规则表（patterns）：供应商检测规则
/// - 服务（services）：内容分类、元数据提取和批处理调度
///
/// 领域层不依赖 HTTP 框架，只通过内容源特质访问网络。
pub mod models;
pub mod patterns;
pub mod services;
