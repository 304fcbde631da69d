// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 域名请求校验错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainRequestError {
    #[error("domain list cannot be empty")]
    Empty,

    #[error("too many domains: {count} (maximum {max})")]
    TooMany { count: usize, max: usize },

    #[error("domain at index {0} is blank")]
    BlankEntry(usize),
}

/// 域名请求
///
/// 一次扫描提交的域名列表，构造后不可变。条目保持调用方给出的顺序，
/// 不去重也不重排，以保证结果中的 `index` 与调用方列表一一对应。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRequest {
    domains: Vec<String>,
}

impl DomainRequest {
    /// 校验并创建域名请求
    ///
    /// # 参数
    ///
    /// * `raw` - 调用方提交的域名，可以是裸域名或带 `http(s)://` 前缀的URL
    /// * `max` - 允许的最大条目数
    ///
    /// # 返回值
    ///
    /// * `Ok(DomainRequest)` - 去除首尾空白后的请求
    /// * `Err(DomainRequestError)` - 列表为空、超长或包含空条目
    pub fn new(raw: Vec<String>, max: usize) -> Result<Self, DomainRequestError> {
        if raw.is_empty() {
            return Err(DomainRequestError::Empty);
        }
        if raw.len() > max {
            return Err(DomainRequestError::TooMany {
                count: raw.len(),
                max,
            });
        }

        let mut domains = Vec::with_capacity(raw.len());
        for (index, entry) in raw.into_iter().enumerate() {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                return Err(DomainRequestError::BlankEntry(index));
            }
            domains.push(trimmed.to_string());
        }

        Ok(Self { domains })
    }

    /// 域名列表
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// 是否为空，校验通过的请求总是返回 false
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
