// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了扫描流程的核心数据结构，包括：
/// - 域名请求（domain_request）：一次扫描提交的域名列表
/// - 扫描结果（scrape_outcome）：单个域名的检测结果
/// - 流事件（stream_event）：推送给调用方的增量事件
pub mod domain_request;
pub mod scrape_outcome;
pub mod stream_event;
