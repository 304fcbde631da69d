// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::settings::Settings;
use crate::domain::patterns::registry::PatternRegistry;
use crate::domain::services::batch_orchestrator::BatchOrchestrator;
use crate::presentation::handlers::{patterns_handler, scan_handler};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<PatternRegistry>,
    pub orchestrator: Arc<BatchOrchestrator>,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/api/scan", post(scan_handler::create_scan))
        .route("/api/patterns", get(patterns_handler::list_patterns))
        .layer(Extension(state.orchestrator))
        .layer(Extension(state.registry))
        .layer(Extension(state.settings));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
