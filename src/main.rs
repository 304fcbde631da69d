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

use portal_scanner::config::settings::Settings;
use portal_scanner::domain::patterns::registry::PatternRegistry;
use portal_scanner::domain::services::batch_orchestrator::{BatchOrchestrator, ScanOptions};
use portal_scanner::domain::services::classifier::ContentClassifier;
use portal_scanner::engines::factory::build_content_source;
use portal_scanner::infrastructure::metrics::init_metrics;
use portal_scanner::presentation::routes::{self, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use portal_scanner::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting portal-scanner...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize Prometheus Metrics
    init_metrics(&settings.metrics);

    // 4. Load vendor patterns
    let registry = Arc::new(PatternRegistry::load(&settings.patterns)?);

    // 5. Initialize Components
    let classifier = Arc::new(ContentClassifier::new(
        registry.clone(),
        settings.scanner.include_final_url,
        settings.scanner.detect_tech,
    ));
    let source = build_content_source(&settings)?;
    let orchestrator = Arc::new(BatchOrchestrator::new(
        source,
        classifier,
        ScanOptions::from_settings(&settings.scanner),
    ));
    info!(
        "Scanner ready: mode={:?}, window={}, timeout={:?}",
        settings.scanner.mode,
        orchestrator.options().window_size,
        orchestrator.options().timeout
    );

    // 6. Start HTTP server
    let app = routes::routes(AppState {
        settings: settings.clone(),
        registry,
        orchestrator,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
