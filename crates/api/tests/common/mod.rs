#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use spdrive_api::config::ServerConfig;
use spdrive_api::router::build_app_router;
use spdrive_api::state::AppState;
use spdrive_core::territory::TerritoryMap;
use spdrive_graph::config::{Credential, GraphConfig};
use spdrive_graph::DriveProxy;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";
pub const DRIVE_PATH: &str = "/v1.0/sites/site-1/drive";
pub const BEARER: &str = "Bearer tok-1";

/// Upload limit used by the test app; small so tests stay cheap.
pub const TEST_UPLOAD_LIMIT: u64 = 1024;

pub const BOUNDARY: &str = "spdrive-test-boundary";

/// Build a test `ServerConfig` whose Graph settings point at `server`.
pub fn test_config(server: &MockServer) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        graph: GraphConfig {
            tenant: "tenant-1".to_string(),
            client_id: "app-123".to_string(),
            credential: Credential::ClientSecret("s3cret".to_string()),
            token_audience: None,
            site_id: "site-1".to_string(),
            territories: TerritoryMap::parse("Austin=01AUS;San Antonio=01SAT").unwrap(),
            authority_host: server.uri(),
            graph_base_url: format!("{}/v1.0", server.uri()),
            upstream_timeout: Duration::from_secs(5),
            max_upload_bytes: TEST_UPLOAD_LIMIT,
        },
    }
}

/// Build the full application router backed by the mock `server`.
pub fn build_test_app(server: &MockServer) -> Router {
    let config = test_config(server);
    let drive = DriveProxy::from_config(&config.graph).expect("proxy should build");
    let state = AppState {
        config: Arc::new(config),
        drive: Arc::new(drive),
    };
    build_app_router(state)
}

pub async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "tok-1",
        })))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_token_rejection(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided.",
        })))
        .mount(server)
        .await;
}

/// Requests the mock received, excluding token requests.
pub async fn graph_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() != TOKEN_PATH)
        .collect()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Build a multipart body with a single part.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
