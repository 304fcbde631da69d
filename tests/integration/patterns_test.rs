// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_patterns_endpoint_lists_vendors() {
    let app = create_test_app();

    let response = app.server.get("/api/patterns").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let payment: Vec<&str> = body["payment"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(payment.first(), Some(&"Stripe"));
    assert!(body["psa"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "ConnectWise"));
    assert!(body["tech"].as_array().is_some());
}
