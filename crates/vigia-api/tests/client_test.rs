#![allow(clippy::unwrap_used)]
// Integration tests for `MonitorClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vigia_api::{Error, MonitorClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MonitorClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MonitorClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── systems_list ────────────────────────────────────────────────────

#[tokio::test]
async fn test_systems_list_grouped_and_ordered() {
    let (server, client) = setup().await;

    let body = json!({
        "servidor-produtos-principais": [
            { "name": "arialief.com", "url": "http://arialief.com" },
            { "name": "presgera.com", "url": "http://presgera.com" },
        ],
        "servidor-produtos-principais-2": [
            { "name": "kymezol.com", "url": "http://kymezol.com" },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/systems_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let servers = client.systems_list().await.unwrap();

    assert_eq!(servers.len(), 2);
    let names: Vec<&String> = servers.keys().collect();
    assert_eq!(names[0], "servidor-produtos-principais");
    assert_eq!(names[1], "servidor-produtos-principais-2");
    assert_eq!(servers["servidor-produtos-principais"].len(), 2);
    assert_eq!(
        servers["servidor-produtos-principais"][0].name,
        "arialief.com"
    );
    assert!(servers["servidor-produtos-principais"][0].status.is_none());
}

#[tokio::test]
async fn test_systems_list_with_inline_statuses() {
    let (server, client) = setup().await;

    let body = json!({
        "srv1": [
            {
                "name": "A",
                "url": "http://a",
                "status": "UP",
                "checked_at": "2024-01-01 00:00:00"
            },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/systems_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let servers = client.systems_list().await.unwrap();
    let entry = &servers["srv1"][0];

    assert_eq!(entry.status.as_deref(), Some("UP"));
    assert_eq!(entry.checked_at.as_deref(), Some("2024-01-01 00:00:00"));
}

#[tokio::test]
async fn test_systems_list_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/systems_list/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.systems_list().await;

    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_systems_list_malformed_body_keeps_raw() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/systems_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.systems_list().await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── system_status ───────────────────────────────────────────────────

#[tokio::test]
async fn test_system_status_sends_query_params() {
    let (server, client) = setup().await;

    // The backend echoes name/url back; those extra fields are ignored.
    let body = json!({
        "name": "arialief.com",
        "url": "http://arialief.com",
        "status": "FORBIDDEN",
        "checked_at": "2024-06-15 10:30:00"
    });

    Mock::given(method("GET"))
        .and(path("/system_status/"))
        .and(query_param("url", "http://arialief.com"))
        .and(query_param("name", "arialief.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client
        .system_status("http://arialief.com", "arialief.com")
        .await
        .unwrap();

    assert_eq!(status.status, "FORBIDDEN");
    assert_eq!(status.checked_at.as_deref(), Some("2024-06-15 10:30:00"));
}

#[tokio::test]
async fn test_system_status_without_timestamp() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/system_status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "DOWN" })))
        .mount(&server)
        .await;

    let status = client.system_status("http://x", "x").await.unwrap();

    assert_eq!(status.status, "DOWN");
    assert!(status.checked_at.is_none());
}

// ── dashboard_summary ───────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_summary_full() {
    let (server, client) = setup().await;

    let body = json!({
        "counts": { "active": 120, "forbidden": 3, "down": 7 },
        "downtime_chart": [
            { "name": "kymezol.com", "total_minutes": 42.5 },
            { "name": "presgera.com", "total_minutes": 0.0 },
        ],
        "detail_anchor": "#downtime"
    });

    Mock::given(method("GET"))
        .and(path("/dashboard_summary/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let summary = client.dashboard_summary().await.unwrap();

    let counts = summary.counts.unwrap();
    assert_eq!(counts.active, 120);
    assert_eq!(counts.forbidden, 3);
    assert_eq!(counts.down, 7);
    assert_eq!(summary.downtime_chart.len(), 2);
    assert_eq!(summary.downtime_chart[0].name, "kymezol.com");
    assert_eq!(summary.detail_anchor.as_deref(), Some("#downtime"));
}

#[tokio::test]
async fn test_dashboard_summary_sparse_fields_default() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dashboard_summary/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let summary = client.dashboard_summary().await.unwrap();

    assert!(summary.counts.is_none());
    assert!(summary.downtime_chart.is_empty());
    assert!(summary.detail_anchor.is_none());
}
