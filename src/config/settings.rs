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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 单域名抓取超时下限（秒）
pub const MIN_TIMEOUT_SECS: u64 = 8;
/// 单域名抓取超时上限（秒）
pub const MAX_TIMEOUT_SECS: u64 = 15;

/// 应用程序配置设置
///
/// 包含服务器、扫描调度、渲染服务、规则表和指标导出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 扫描配置
    pub scanner: ScannerSettings,
    /// 外部渲染服务配置
    pub render_provider: RenderProviderSettings,
    /// 规则表配置
    #[serde(default)]
    pub patterns: PatternSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 批处理调度模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// 固定窗口并发
    Concurrent,
    /// 逐个顺序处理
    Sequential,
}

/// 扫描配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerSettings {
    /// 调度模式，每个部署固定一种
    pub mode: ScanMode,
    /// 每个并发窗口的域名数
    pub window_size: usize,
    /// 单个域名的抓取超时（秒），会被限制在 8-15 之间
    pub timeout_secs: u64,
    /// 单次请求允许的最大域名数
    pub max_domains: usize,
    /// 是否把最终跳转后的URL拼入分类文本
    pub include_final_url: bool,
    /// 是否提取联系方式等页面元数据
    pub extract_details: bool,
    /// 是否检测技术栈
    pub detect_tech: bool,
    /// 结果通道容量
    pub channel_capacity: usize,
    /// 直连抓取使用的 User-Agent
    pub user_agent: String,
}

impl ScannerSettings {
    /// 返回限制后的单域名超时
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS))
    }
}

/// 外部渲染服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RenderProviderSettings {
    /// 服务名称，用于日志和 info 事件
    pub name: String,
    /// API 地址
    pub base_url: String,
    /// API 密钥，未设置时使用直连抓取
    pub api_key: Option<String>,
    /// 是否要求服务执行 JS 渲染
    pub render_js: bool,
}

impl RenderProviderSettings {
    /// 是否已配置渲染服务
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// 规则表配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternSettings {
    /// 外部规则表 YAML 路径，为空时使用内置规则表
    pub path: Option<String>,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PORTAL_SCANNER").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置，不读取文件和环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Scanner
            .set_default("scanner.mode", "concurrent")?
            .set_default("scanner.window_size", 5)?
            .set_default("scanner.timeout_secs", 10)?
            .set_default("scanner.max_domains", 30)?
            .set_default("scanner.include_final_url", true)?
            .set_default("scanner.extract_details", true)?
            .set_default("scanner.detect_tech", false)?
            .set_default("scanner.channel_capacity", 32)?
            .set_default(
                "scanner.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
            )?
            // Render provider
            .set_default("render_provider.name", "scraperapi")?
            .set_default("render_provider.base_url", "https://api.scraperapi.com/")?
            .set_default("render_provider.render_js", true)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
