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

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::{
    application::dto::scan_request::ScanRequestDto,
    config::settings::Settings,
    domain::models::domain_request::DomainRequest,
    domain::services::batch_orchestrator::BatchOrchestrator,
    presentation::{errors::AppError, stream_encoder},
};

/// 发起扫描
///
/// 输入在任何网络请求之前完成校验，非法输入返回 400；
/// 校验通过后以 SSE 流逐条推送扫描事件
pub async fn create_scan(
    Extension(orchestrator): Extension<Arc<BatchOrchestrator>>,
    Extension(settings): Extension<Arc<Settings>>,
    payload: Result<Json<ScanRequestDto>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let request = DomainRequest::new(payload.domains, settings.scanner.max_domains)?;
    info!(
        "Starting scan of {} domains via {}",
        request.len(),
        orchestrator.source_name()
    );

    let rx = orchestrator.start(request, settings.scanner.channel_capacity);
    Ok(Sse::new(stream_encoder::sse_stream(rx)).keep_alive(KeepAlive::default()))
}
