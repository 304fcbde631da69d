// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::config::settings::Settings;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::render_engine::RenderEngine;
use crate::engines::traits::ContentSource;

/// 按配置选择内容源
///
/// 配置了渲染服务 API key 时使用渲染引擎，否则使用直连抓取。
/// 选择在启动时完成一次，整个进程内不再改变。
pub fn build_content_source(settings: &Settings) -> anyhow::Result<Arc<dyn ContentSource>> {
    let timeout = settings.scanner.timeout();

    let source: Arc<dyn ContentSource> = if settings.render_provider.is_configured() {
        Arc::new(RenderEngine::new(&settings.render_provider, timeout)?)
    } else {
        Arc::new(ReqwestEngine::from_settings(&settings.scanner)?)
    };

    info!("Using content source: {}", source.name());
    Ok(source)
}
