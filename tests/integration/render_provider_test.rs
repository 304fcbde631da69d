// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app_with, parse_events, results};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_scan_through_render_provider() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("url", "https://acme-billing.example/"))
        .and(query_param("render", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><script src="https://www.paypal.com/sdk/js?client-id=acme"></script></body></html>"#,
        ))
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(query_param("url", "https://broken.example/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .mount(&provider)
        .await;

    let base_url = provider.uri();
    let app = create_test_app_with(move |s| {
        s.render_provider.base_url = base_url;
        s.render_provider.api_key = Some("test-key".to_string());
    });

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": ["acme-billing.example", "broken.example"] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let events = parse_events(&response.text());
    assert_eq!(
        events[0],
        json!({"type": "info", "scraper": "render:scraperapi"})
    );

    let outcomes = results(&events);
    assert_eq!(outcomes.len(), 2);

    let billing = outcomes.iter().find(|o| o["index"] == 0).unwrap();
    assert_eq!(billing["status"], "done");
    assert_eq!(billing["paymentPortals"], json!(["PayPal"]));

    let broken = outcomes.iter().find(|o| o["index"] == 1).unwrap();
    assert_eq!(broken["status"], "error");
    let error = broken["error"].as_str().unwrap();
    assert!(error.starts_with("Unknown error: render provider HTTP 500"), "{}", error);
}
