// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, create_test_app_with, parse_events, results};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PORTAL_PAGE: &str = r#"<!doctype html>
<html>
<head>
    <title>Acme Managed IT</title>
    <meta name="description" content="Managed services for small business">
</head>
<body>
    <script src="https://js.stripe.com/v3/"></script>
    <script src="/wp-content/themes/acme/jquery.js"></script>
    <a href="https://acme.zendesk.com/hc/en-us">Support</a>
    <a href="https://www.linkedin.com/company/acme">LinkedIn</a>
    <p>Email billing@acme-it.com or call (612) 555-0187</p>
</body>
</html>"#;

async fn start_origin() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PORTAL_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Nothing here</body></html>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

fn assert_error_body(body: &Value, fragment: &str) {
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains(fragment), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_empty_domain_list_rejected() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": [] }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_body(&response.json::<Value>(), "cannot be empty");
}

#[tokio::test]
async fn test_too_many_domains_rejected() {
    let app = create_test_app();
    let domains: Vec<String> = (0..31).map(|i| format!("site{}.example", i)).collect();

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": domains }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_body(&response.json::<Value>(), "30");
}

#[tokio::test]
async fn test_blank_entry_rejected() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": ["acme.io", "   "] }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "urls": ["acme.io"] }))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_scan_streams_results() {
    let origin = start_origin().await;
    let app = create_test_app_with(|s| s.scanner.detect_tech = true);
    let domains = vec![
        format!("{}/portal", origin.uri()),
        format!("{}/missing", origin.uri()),
        format!("{}/plain", origin.uri()),
    ];

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": domains }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let events = parse_events(&response.text());
    assert_eq!(events.first().unwrap(), &json!({"type": "info", "scraper": "direct"}));
    assert_eq!(events.last().unwrap(), &json!({"type": "batch_complete"}));
    assert_eq!(
        events.iter().filter(|e| e["type"] == "batch_complete").count(),
        1
    );

    let outcomes = results(&events);
    assert_eq!(outcomes.len(), 3);

    let portal = outcomes.iter().find(|o| o["index"] == 0).unwrap();
    assert_eq!(portal["domain"], domains[0].as_str());
    assert_eq!(portal["status"], "done");
    assert_eq!(portal["paymentPortals"], json!(["Stripe"]));
    assert_eq!(portal["psaPortals"], json!(["Zendesk"]));
    assert_eq!(portal["details"]["title"], "Acme Managed IT");
    assert_eq!(portal["details"]["emails"], json!(["billing@acme-it.com"]));
    assert_eq!(
        portal["details"]["socialLinks"]["linkedin"],
        "https://www.linkedin.com/company/acme"
    );
    let tech: Vec<&str> = portal["techStack"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(tech.contains(&"WordPress"));

    let missing = outcomes.iter().find(|o| o["index"] == 1).unwrap();
    assert_eq!(missing["status"], "error");
    assert!(missing["error"].as_str().unwrap().contains("404"));
    assert_eq!(missing["paymentPortals"], json!([]));
    assert_eq!(missing["psaPortals"], json!([]));
    assert!(missing.get("details").is_none());

    let plain = outcomes.iter().find(|o| o["index"] == 2).unwrap();
    assert_eq!(plain["status"], "done");
    assert_eq!(plain["paymentPortals"], json!([]));
}

#[tokio::test]
async fn test_windows_complete_in_order() {
    let origin = MockServer::start().await;
    for i in 0..7u64 {
        // Earlier domains answer more slowly so each window completes out of input order.
        Mock::given(method("GET"))
            .and(path(format!("/site{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html>js.stripe.com</html>")
                    .set_delay(Duration::from_millis(50 * (7 - i))),
            )
            .mount(&origin)
            .await;
    }
    let app = create_test_app();
    let domains: Vec<String> = (0..7).map(|i| format!("{}/site{}", origin.uri(), i)).collect();

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": domains }))
        .await;

    let events = parse_events(&response.text());
    let order: Vec<u64> = results(&events)
        .iter()
        .map(|o| o["index"].as_u64().unwrap())
        .collect();

    assert_eq!(order.len(), 7);
    let first_window: HashSet<u64> = order[..5].iter().copied().collect();
    let second_window: HashSet<u64> = order[5..].iter().copied().collect();
    assert_eq!(first_window, (0..5).collect());
    assert_eq!(second_window, (5..7).collect());
}

#[tokio::test]
async fn test_unreachable_domain_is_isolated() {
    let origin = start_origin().await;
    let app = create_test_app();
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let domains = vec![
        format!("http://{}/", closed),
        format!("{}/portal", origin.uri()),
    ];

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": domains }))
        .await;

    let events = parse_events(&response.text());
    let outcomes = results(&events);
    assert_eq!(outcomes.len(), 2);

    let refused = outcomes.iter().find(|o| o["index"] == 0).unwrap();
    assert_eq!(refused["status"], "error");
    assert_eq!(refused["error"], "Connection refused");

    let portal = outcomes.iter().find(|o| o["index"] == 1).unwrap();
    assert_eq!(portal["status"], "done");
    assert_eq!(portal["paymentPortals"], json!(["Stripe"]));
}

#[tokio::test]
async fn test_sequential_mode_emits_processing() {
    let origin = start_origin().await;
    let app = create_test_app_with(|s| {
        s.scanner.mode = portal_scanner::config::settings::ScanMode::Sequential
    });
    let domains = vec![
        format!("{}/plain", origin.uri()),
        format!("{}/portal", origin.uri()),
    ];

    let response = app
        .server
        .post("/api/scan")
        .json(&json!({ "domains": domains }))
        .await;

    let events = parse_events(&response.text());
    let kinds: Vec<String> = events
        .iter()
        .map(|e| match e["type"].as_str().unwrap() {
            "processing" | "result" => format!("{}:{}", e["type"].as_str().unwrap(), e["index"]),
            other => other.to_string(),
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "info",
            "processing:0",
            "result:0",
            "processing:1",
            "result:1",
            "batch_complete"
        ]
    );
}
