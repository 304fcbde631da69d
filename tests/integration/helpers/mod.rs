// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Router;
use axum_test::TestServer;
use portal_scanner::config::settings::Settings;
use portal_scanner::domain::patterns::registry::PatternRegistry;
use portal_scanner::domain::services::batch_orchestrator::{BatchOrchestrator, ScanOptions};
use portal_scanner::domain::services::classifier::ContentClassifier;
use portal_scanner::engines::factory::build_content_source;
use portal_scanner::presentation::routes::{self, AppState};
use serde_json::Value;
use std::sync::Arc;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub settings: Arc<Settings>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(|_| {})
}

/// 在默认配置基础上调整后创建测试应用
pub fn create_test_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    let mut settings = Settings::defaults().unwrap();
    configure(&mut settings);
    let settings = Arc::new(settings);

    TestApp {
        server: TestServer::new(build_router(settings.clone())).unwrap(),
        settings,
    }
}

/// 使用默认配置构建路由，不经过测试服务器
#[allow(dead_code)]
pub fn create_test_app_router() -> Router {
    build_router(Arc::new(Settings::defaults().unwrap()))
}

fn build_router(settings: Arc<Settings>) -> Router {
    let registry = Arc::new(PatternRegistry::load(&settings.patterns).unwrap());
    let classifier = Arc::new(ContentClassifier::new(
        registry.clone(),
        settings.scanner.include_final_url,
        settings.scanner.detect_tech,
    ));
    let source = build_content_source(&settings).unwrap();
    let orchestrator = Arc::new(BatchOrchestrator::new(
        source,
        classifier,
        ScanOptions::from_settings(&settings.scanner),
    ));

    routes::routes(AppState {
        settings,
        registry,
        orchestrator,
    })
}

/// 解析 SSE 响应体中的所有 `data:` 行
pub fn parse_events(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}

/// 只保留 result 事件
#[allow(dead_code)]
pub fn results(events: &[Value]) -> Vec<&Value> {
    events.iter().filter(|e| e["type"] == "result").collect()
}
