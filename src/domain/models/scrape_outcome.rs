// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::BTreeMap;

/// 扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    /// 抓取和分类完成
    Done,
    /// 抓取失败
    Error,
}

/// 技术栈命中项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechMatch {
    /// 技术名称
    pub name: String,
    /// 分类标签
    pub category: String,
}

/// 页面元数据
///
/// 所有字段都是尽力提取，缺失时为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    /// 页面标题
    pub title: String,
    /// 页面描述
    pub description: String,
    /// 邮箱地址，最多 5 个
    pub emails: Vec<String>,
    /// 电话号码，最多 5 个
    pub phones: Vec<String>,
    /// 社交平台链接，每个平台最多一个
    pub social_links: BTreeMap<String, String>,
}

/// 单个域名的扫描结果
///
/// 每个输入域名恰好生成一个，发出后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    /// 原始输入域名
    pub domain: String,
    /// 在请求中的位置
    pub index: usize,
    /// 扫描状态
    pub status: ScrapeStatus,
    /// 命中的支付门户，按规则表声明顺序
    pub payment_portals: Vec<String>,
    /// 命中的 PSA 服务台，按规则表声明顺序
    pub psa_portals: Vec<String>,
    /// 命中的技术栈，仅在启用技术栈检测时输出
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<TechMatch>>,
    /// 页面元数据，仅在成功且启用元数据提取时输出
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PageDetails>,
    /// 失败原因，仅在失败时输出
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeOutcome {
    /// 创建成功结果
    pub fn done(domain: impl Into<String>, index: usize) -> Self {
        Self {
            domain: domain.into(),
            index,
            status: ScrapeStatus::Done,
            payment_portals: Vec::new(),
            psa_portals: Vec::new(),
            tech_stack: None,
            details: None,
            error: None,
        }
    }

    /// 创建失败结果，两个门户列表均为空
    pub fn failed(domain: impl Into<String>, index: usize, error: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            index,
            status: ScrapeStatus::Error,
            payment_portals: Vec::new(),
            psa_portals: Vec::new(),
            tech_stack: None,
            details: None,
            error: Some(error.into()),
        }
    }

    /// 是否成功
    pub fn is_done(&self) -> bool {
        self.status == ScrapeStatus::Done
    }
}
