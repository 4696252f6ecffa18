use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bitbridge::auth::Credentials;
use bitbridge::bitbucket::BitbucketClient;
use bitbridge::config::{Config, HttpConfig};
use bitbridge::server::{AppState, router};

/// Boot the real router on an ephemeral port, pointed at a wiremock
/// Bitbucket, and return the bound address.
async fn spawn_app(upstream: &MockServer) -> SocketAddr {
    let config = Config {
        base_url: upstream.uri(),
        credentials: Credentials::new(Some("ci".into()), Some("token".into())),
        host: "127.0.0.1".into(),
        port: 0,
        http: HttpConfig::default(),
    };
    let client = Arc::new(BitbucketClient::new(&config).unwrap());
    let app = router(AppState { client });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn page(values: serde_json::Value) -> serde_json::Value {
    json!({ "values": values, "isLastPage": true })
}

#[tokio::test]
async fn test_pull_requests_route_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/ENG/repos/backend/pull-requests"))
        .and(query_param("state", "OPEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{
            "id": 42,
            "title": "Fix bug",
            "state": "OPEN",
            "author": { "user": { "displayName": "Jane Doe" } }
        }]))))
        .mount(&upstream)
        .await;

    let addr = spawn_app(&upstream).await;
    let resp = reqwest::get(format!("http://{addr}/api/v1/ENG/backend/pull-requests"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.text().await.unwrap(),
        "ID: 42\nTitle: Fix bug\nState: OPEN\nAuthor: Jane Doe\n"
    );
}

#[tokio::test]
async fn test_pull_requests_route_empty_sentinel() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/ENG/repos/backend/pull-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]))))
        .mount(&upstream)
        .await;

    let addr = spawn_app(&upstream).await;
    let resp = reqwest::get(format!("http://{addr}/api/v1/ENG/backend/pull-requests"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "No pull requests found.");
}

#[tokio::test]
async fn test_changes_route_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/rest/api/1.0/projects/ENG/repos/backend/pull-requests/7/changes",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{
            "path": { "toString": "src/lib.rs" },
            "type": "MODIFY",
            "linesAdded": 4,
            "linesRemoved": 1
        }]))))
        .mount(&upstream)
        .await;

    let addr = spawn_app(&upstream).await;
    let resp = reqwest::get(format!(
        "http://{addr}/api/v1/ENG/backend/pull-requests/7/changes"
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.text().await.unwrap(),
        "Path: src/lib.rs\nType: MODIFY\nAdded: 4\nRemoved: 1\n"
    );
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&upstream)
        .await;

    let addr = spawn_app(&upstream).await;
    let resp = reqwest::get(format!("http://{addr}/api/v1/ENG/backend/pull-requests"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body = resp.text().await.unwrap();
    assert!(body.contains("500"), "body: {body}");
}

#[tokio::test]
async fn test_diff_route_passthrough_and_path_encoding() {
    let upstream = MockServer::start().await;
    let diff = "--- a/docs/release notes.md\r\n+++ b/docs/release notes.md\r\n@@ -1 +1 @@\r\n-old\r\n+new\r\n";
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(diff))
        .mount(&upstream)
        .await;

    let addr = spawn_app(&upstream).await;
    let resp = reqwest::get(format!(
        "http://{addr}/api/v1/ENG/backend/7/docs/release%20notes.md"
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), diff);

    // The space must be re-encoded on the upstream wire.
    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/rest/api/1.0/projects/ENG/repos/backend/pull-requests/7/diff/docs/release%20notes.md"
    );
}

#[tokio::test]
async fn test_repeated_identical_calls_are_byte_identical() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/ENG/repos/backend/pull-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{
            "id": 9,
            "title": "Same",
            "state": "OPEN",
            "author": { "user": { "displayName": "Jane Doe" } }
        }]))))
        .mount(&upstream)
        .await;

    let addr = spawn_app(&upstream).await;
    let url = format!("http://{addr}/api/v1/ENG/backend/pull-requests");
    let first = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    let second = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_welcome_and_health_routes() {
    let upstream = MockServer::start().await;
    let addr = spawn_app(&upstream).await;

    let welcome: serde_json::Value = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(welcome["name"], "bitbridge");

    let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
}
