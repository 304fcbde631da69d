// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

use super::scrape_outcome::ScrapeOutcome;

/// 推送给调用方的流事件
///
/// 序列化后以 `type` 字段区分。每个请求恰好以一个 `batch_complete` 结束。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// 当前使用的内容源
    Info { scraper: String },
    /// 顺序模式下某个域名开始处理
    Processing { domain: String, index: usize },
    /// 单个域名的结果
    Result(ScrapeOutcome),
    /// 批次结束标记
    BatchComplete,
}

impl StreamEvent {
    /// 是否为结束标记
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::BatchComplete)
    }
}
