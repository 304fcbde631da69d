// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::config::settings::PatternSettings;

/// 内置规则表
const BUILTIN_PATTERNS: &str = include_str!("../../../config/patterns.yaml");

/// 规则表错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    /// 读取规则文件失败
    #[error("failed to read pattern file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML 解析失败
    #[error("invalid pattern document: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// 正则表达式无效
    #[error("invalid regex for vendor {vendor}: {source}")]
    InvalidRegex {
        vendor: String,
        #[source]
        source: regex::Error,
    },
    /// 供应商没有任何规则
    #[error("vendor {0} has no patterns")]
    EmptyVendor(String),
    /// 同一类别中供应商重名
    #[error("duplicate vendor {vendor} in category {category}")]
    DuplicateVendor { category: Category, vendor: String },
}

/// 检测类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 支付门户
    Payment,
    /// PSA/服务台
    Psa,
    /// 技术栈
    Tech,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Payment => write!(f, "payment"),
            Category::Psa => write!(f, "psa"),
            Category::Tech => write!(f, "tech"),
        }
    }
}

#[derive(Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    payment: Vec<VendorSpec>,
    #[serde(default)]
    psa: Vec<VendorSpec>,
    #[serde(default)]
    tech: Vec<VendorSpec>,
}

#[derive(Deserialize)]
struct VendorSpec {
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    patterns: Vec<PatternSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternSpec {
    Literal(String),
    Regex { regex: String },
}

/// 单条匹配规则
#[derive(Debug, Clone)]
pub enum Matcher {
    /// 子串匹配，已转为小写
    Literal(String),
    /// 不区分大小写的正则匹配
    Pattern(Regex),
}

impl Matcher {
    /// 判断文本是否命中，`text` 需已转为小写
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Literal(needle) => text.contains(needle.as_str()),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

/// 供应商检测规则
#[derive(Debug, Clone)]
pub struct VendorRule {
    /// 供应商名称
    pub name: String,
    /// 技术栈分类标签
    pub tag: Option<String>,
    /// 有序规则列表
    pub matchers: Vec<Matcher>,
}

impl VendorRule {
    /// 任一规则命中即返回 true，命中后不再检查剩余规则
    pub fn matches(&self, text: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(text))
    }
}

/// 规则表摘要，供调用方展示可检测的供应商
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub payment: Vec<String>,
    pub psa: Vec<String>,
    pub tech: Vec<String>,
}

/// 供应商规则注册表
///
/// 启动时加载一次，之后只读，可在并发抓取任务间共享
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    payment: Vec<VendorRule>,
    psa: Vec<VendorRule>,
    tech: Vec<VendorRule>,
}

impl PatternRegistry {
    /// 加载编译进程序的内置规则表
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_yaml(BUILTIN_PATTERNS)
    }

    /// 从 YAML 文本构建注册表
    pub fn from_yaml(source: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = serde_yaml::from_str(source)?;

        Ok(Self {
            payment: compile_category(Category::Payment, document.payment)?,
            psa: compile_category(Category::Psa, document.psa)?,
            tech: compile_category(Category::Tech, document.tech)?,
        })
    }

    /// 从 YAML 文件构建注册表
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// 根据配置加载注册表，未指定路径时使用内置规则表
    pub fn load(settings: &PatternSettings) -> Result<Self, RegistryError> {
        let registry = match settings.path.as_deref() {
            Some(path) if !path.trim().is_empty() => {
                info!("Loading vendor patterns from {}", path);
                Self::from_path(path)?
            }
            _ => Self::builtin()?,
        };

        info!(
            "Pattern registry loaded: {} payment, {} psa, {} tech vendors",
            registry.payment.len(),
            registry.psa.len(),
            registry.tech.len()
        );
        Ok(registry)
    }

    /// 获取某一类别的供应商规则，顺序即声明顺序
    pub fn vendors(&self, category: Category) -> &[VendorRule] {
        match category {
            Category::Payment => &self.payment,
            Category::Psa => &self.psa,
            Category::Tech => &self.tech,
        }
    }

    /// 返回各类别的供应商名称
    pub fn summary(&self) -> RegistrySummary {
        let names = |rules: &[VendorRule]| rules.iter().map(|r| r.name.clone()).collect();
        RegistrySummary {
            payment: names(&self.payment),
            psa: names(&self.psa),
            tech: names(&self.tech),
        }
    }
}

fn compile_category(
    category: Category,
    specs: Vec<VendorSpec>,
) -> Result<Vec<VendorRule>, RegistryError> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(specs.len());

    for spec in specs {
        if !seen.insert(spec.name.clone()) {
            return Err(RegistryError::DuplicateVendor {
                category,
                vendor: spec.name,
            });
        }
        if spec.patterns.is_empty() {
            return Err(RegistryError::EmptyVendor(spec.name));
        }

        let mut matchers = Vec::with_capacity(spec.patterns.len());
        for pattern in spec.patterns {
            let matcher = match pattern {
                PatternSpec::Literal(literal) => Matcher::Literal(literal.to_lowercase()),
                PatternSpec::Regex { regex } => {
                    let re = RegexBuilder::new(&regex)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| RegistryError::InvalidRegex {
                            vendor: spec.name.clone(),
                            source,
                        })?;
                    Matcher::Pattern(re)
                }
            };
            matchers.push(matcher);
        }

        rules.push(VendorRule {
            name: spec.name,
            tag: spec.category,
            matchers,
        });
    }

    Ok(rules)
}
