#![allow(dead_code)]

use std::time::Duration;

use spdrive_core::territory::TerritoryMap;
use spdrive_graph::config::{Credential, GraphConfig};
use spdrive_graph::DriveProxy;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT: &str = "tenant-1";
pub const CLIENT_ID: &str = "app-123";
pub const SITE_ID: &str = "site-1";
pub const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";
pub const DRIVE_PATH: &str = "/v1.0/sites/site-1/drive";
pub const BEARER: &str = "Bearer tok-1";

pub const PRIVATE_KEY: &str = include_str!("../fixtures/signing_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/signing_key.pub.pem");

/// Graph configuration pointing both the token endpoint and Graph at `server`.
pub fn config(server: &MockServer) -> GraphConfig {
    GraphConfig {
        tenant: TENANT.to_string(),
        client_id: CLIENT_ID.to_string(),
        credential: Credential::ClientSecret("s3cret".to_string()),
        token_audience: None,
        site_id: SITE_ID.to_string(),
        territories: TerritoryMap::parse("Austin=01AUS;San Antonio=01SAT").unwrap(),
        authority_host: server.uri(),
        graph_base_url: format!("{}/v1.0", server.uri()),
        upstream_timeout: Duration::from_secs(5),
        max_upload_bytes: spdrive_core::types::MAX_UPLOAD_BYTES,
    }
}

pub fn certificate_config(server: &MockServer) -> GraphConfig {
    GraphConfig {
        credential: Credential::Certificate {
            private_key_pem: PRIVATE_KEY.to_string(),
            thumbprint: "5D1B7A3C9E0F24681357ACE02468BDF13579ACE0".to_string(),
        },
        ..config(server)
    }
}

pub fn proxy(server: &MockServer) -> DriveProxy {
    DriveProxy::from_config(&config(server)).expect("proxy should build")
}

pub fn token_url(server: &MockServer) -> String {
    format!("{}{TOKEN_PATH}", server.uri())
}

pub fn token_body() -> serde_json::Value {
    serde_json::json!({
        "token_type": "Bearer",
        "expires_in": 3599,
        "ext_expires_in": 3599,
        "access_token": "tok-1",
    })
}

/// Token endpoint answering successfully, expected `times` times.
pub async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(times)
        .mount(server)
        .await;
}

/// Token endpoint rejecting every request with `status`.
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

/// Requests the server received whose path does not start with the token path.
pub async fn graph_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() != TOKEN_PATH)
        .collect()
}

pub async fn token_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == TOKEN_PATH)
        .collect()
}

/// Extract a form field from an `application/x-www-form-urlencoded` body.
///
/// Only meant for values the form encoder leaves untouched (e.g. JWTs).
pub fn form_field(request: &wiremock::Request, name: &str) -> Option<String> {
    let body = String::from_utf8(request.body.clone()).ok()?;
    body.split('&')
        .find_map(|pair| pair.strip_prefix(&format!("{name}=")).map(str::to_string))
}
