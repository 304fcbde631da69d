// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::error::Error as StdError;
use thiserror::Error;
use url::Url;

use crate::engines::deadline::Deadline;
use crate::utils::text_utils::truncate_chars;

/// 未分类错误信息的最大长度
pub const MAX_ERROR_MESSAGE_CHARS: usize = 50;

/// 抓取错误类型
///
/// 每个域名的失败都会归入其中一类，`Display` 输出即结果中的 `error` 字段
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 超时或被取消
    #[error("Timeout: no response within the time limit")]
    Timeout,
    /// DNS 解析失败
    #[error("DNS resolution failed")]
    DnsError,
    /// 连接被拒绝
    #[error("Connection refused")]
    ConnectionRefused,
    /// TLS/证书错误
    #[error("SSL/TLS certificate error")]
    TlsError,
    /// 连接被重置
    #[error("Connection reset")]
    ConnectionReset,
    /// 非 2xx 状态码
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// 其他错误，信息最多 50 个字符
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl FetchError {
    /// 创建未分类错误，信息会被截断
    pub fn unknown(message: impl AsRef<str>) -> Self {
        FetchError::Unknown(truncate_chars(message.as_ref(), MAX_ERROR_MESSAGE_CHARS))
    }

    /// 把 reqwest 错误归类
    ///
    /// 依次检查超时标志、状态码和整条错误链上的信息
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return FetchError::HttpStatus(status.as_u16());
        }

        Self::classify_message(&error_chain(err).to_lowercase())
            .unwrap_or_else(|| FetchError::unknown(innermost_message(err)))
    }

    /// 根据错误信息归类，无法识别时返回 None
    pub fn classify_message(message: &str) -> Option<Self> {
        const DNS: [&str; 5] = [
            "dns error",
            "failed to lookup address",
            "name or service not known",
            "no such host",
            "nodename nor servname",
        ];
        const REFUSED: [&str; 2] = ["connection refused", "actively refused"];
        const RESET: [&str; 3] = ["connection reset", "reset by peer", "broken pipe"];
        const TLS: [&str; 4] = ["certificate", "tls", "ssl", "handshake"];

        let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

        if has(&DNS) {
            Some(FetchError::DnsError)
        } else if has(&REFUSED) {
            Some(FetchError::ConnectionRefused)
        } else if has(&RESET) {
            Some(FetchError::ConnectionReset)
        } else if has(&TLS) {
            Some(FetchError::TlsError)
        } else if message.contains("timed out") {
            Some(FetchError::Timeout)
        } else {
            None
        }
    }

    /// 用于指标标签的简短类别名
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::DnsError => "dns",
            FetchError::ConnectionRefused => "connection_refused",
            FetchError::TlsError => "tls",
            FetchError::ConnectionReset => "connection_reset",
            FetchError::HttpStatus(_) => "http_status",
            FetchError::Unknown(_) => "unknown",
        }
    }
}

// The top-level reqwest message embeds the request URL, so only the causes are inspected.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    if parts.is_empty() {
        return err.to_string();
    }
    parts.join(": ")
}

fn innermost_message(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(inner) = current.source() {
        current = inner;
    }
    current.to_string()
}

/// 抓取目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// 原始输入域名
    pub domain: String,
    /// 解析后的完整URL
    pub url: Url,
}

impl FetchTarget {
    /// 把域名解析为URL，没有协议时补全 `https://`
    pub fn resolve(domain: &str) -> Result<Self, FetchError> {
        let trimmed = domain.trim();
        let lower = trimmed.to_ascii_lowercase();
        let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate)
            .map_err(|e| FetchError::unknown(format!("Invalid URL: {}", e)))?;
        if url.host_str().is_none() {
            return Err(FetchError::unknown("Invalid URL: missing host"));
        }

        Ok(Self {
            domain: domain.to_string(),
            url,
        })
    }
}

/// 抓取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 页面 HTML
    pub html: String,
    /// 跳转后的最终URL，渲染服务不提供
    pub final_url: Option<String>,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 内容源特质
///
/// 直连抓取和外部渲染服务是它的两种实现，启动时按配置选定一种
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// 在给定时限内获取页面内容
    async fn fetch(&self, target: &FetchTarget, deadline: &Deadline)
        -> Result<FetchedPage, FetchError>;

    /// 内容源名称，出现在 info 事件中
    fn name(&self) -> &str;
}
