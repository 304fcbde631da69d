// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::domain::models::domain_request::DomainRequestError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 是否为调用方输入错误
    fn is_client_error(&self) -> bool {
        self.0.is::<DomainRequestError>()
            || self.0.is::<ValidationErrors>()
            || self.0.is::<JsonRejection>()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if self.is_client_error() {
            warn!("Rejected request: {}", error_message);
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {:#}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
