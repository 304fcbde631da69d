// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json};
use std::sync::Arc;

use crate::domain::patterns::registry::{PatternRegistry, RegistrySummary};

/// 列出可检测的供应商名称
pub async fn list_patterns(
    Extension(registry): Extension<Arc<PatternRegistry>>,
) -> Json<RegistrySummary> {
    Json(registry.summary())
}
