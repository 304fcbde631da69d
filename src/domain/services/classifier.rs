// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::domain::models::scrape_outcome::TechMatch;
use crate::domain::patterns::registry::{Category, PatternRegistry, VendorRule};

/// 分类结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// 命中的支付门户
    pub payment_portals: Vec<String>,
    /// 命中的 PSA 服务台
    pub psa_portals: Vec<String>,
    /// 命中的技术栈，未启用时为空
    pub tech_stack: Vec<TechMatch>,
}

/// 内容分类器
///
/// 把规则表应用到页面内容上。纯同步计算，可在并发任务间共享。
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    registry: Arc<PatternRegistry>,
    include_final_url: bool,
    detect_tech: bool,
}

impl ContentClassifier {
    /// 创建分类器
    ///
    /// # 参数
    ///
    /// * `registry` - 共享的规则表
    /// * `include_final_url` - 是否把最终URL拼入分类文本
    /// * `detect_tech` - 是否检测技术栈
    pub fn new(registry: Arc<PatternRegistry>, include_final_url: bool, detect_tech: bool) -> Self {
        Self {
            registry,
            include_final_url,
            detect_tech,
        }
    }

    /// 是否检测技术栈
    pub fn detects_tech(&self) -> bool {
        self.detect_tech
    }

    /// 构造分类文本：小写的正文，按配置追加小写的最终URL
    pub fn classification_text(&self, body: &str, final_url: Option<&str>) -> String {
        let mut text = body.to_lowercase();
        if self.include_final_url {
            if let Some(url) = final_url {
                text.push('\n');
                text.push_str(&url.to_lowercase());
            }
        }
        text
    }

    /// 对页面内容分类
    pub fn classify(&self, body: &str, final_url: Option<&str>) -> Classification {
        let text = self.classification_text(body, final_url);
        self.classify_text(&text)
    }

    /// 对已小写的文本分类
    ///
    /// 输出顺序即规则表声明顺序，同一供应商在一个类别中最多出现一次
    pub fn classify_text(&self, text: &str) -> Classification {
        let tech_stack = if self.detect_tech {
            matching(self.registry.vendors(Category::Tech), text)
                .map(|rule| TechMatch {
                    name: rule.name.clone(),
                    category: rule.tag.clone().unwrap_or_default(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Classification {
            payment_portals: matching(self.registry.vendors(Category::Payment), text)
                .map(|rule| rule.name.clone())
                .collect(),
            psa_portals: matching(self.registry.vendors(Category::Psa), text)
                .map(|rule| rule.name.clone())
                .collect(),
            tech_stack,
        }
    }
}

fn matching<'a>(
    rules: &'a [VendorRule],
    text: &'a str,
) -> impl Iterator<Item = &'a VendorRule> + 'a {
    rules.iter().filter(move |rule| rule.matches(text))
}
