use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use spdrive_core::error::CoreError;
use spdrive_graph::{AuthError, GraphError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`GraphError`] for proxy failures and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses,
/// except for upstream Graph errors, which are relayed with their original
/// status and body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failure from the Graph client, including local precondition errors.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the server's body limit before it could be
    /// measured by the proxy.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Graph(GraphError::Core(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Graph(GraphError::Upstream { status, body }) => {
                return relay_upstream_error(status, body);
            }
            AppError::Graph(GraphError::Core(core)) => classify_core_error(core),
            AppError::Graph(GraphError::Auth(err)) => {
                tracing::error!(error = %err, "Access token acquisition failed");
                (StatusCode::BAD_GATEWAY, "AUTH_ERROR", auth_message(&err))
            }
            AppError::Graph(err @ GraphError::Timeout { .. }) => {
                tracing::warn!(error = %err, "Upstream timeout");
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", err.to_string())
            }
            AppError::Graph(GraphError::Request(err)) => {
                tracing::error!(error = %err, "Graph API unreachable");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_GATEWAY",
                    "Graph API unreachable".to_string(),
                )
            }
            AppError::Graph(GraphError::MalformedResponse(msg)) => {
                tracing::error!(error = %msg, "Malformed Graph response");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_GATEWAY",
                    "Graph API returned a malformed response".to_string(),
                )
            }
            AppError::Graph(GraphError::InvalidUrl(msg)) => {
                tracing::error!(error = %msg, "Invalid Graph URL");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::UnknownTerritory(_) => {
            (StatusCode::NOT_FOUND, "UNKNOWN_TERRITORY", err.to_string())
        }
        CoreError::PayloadTooLarge { .. } => {
            (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", err.to_string())
        }
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
    }
}

/// Token-endpoint rejections carry the identity platform's own diagnostics
/// (e.g. `AADSTS7000215`), which are passed on; transport details are not.
fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::Unreachable(_) => "Token endpoint unreachable".to_string(),
        AuthError::Signing(_) => "Client assertion could not be signed".to_string(),
        other => format!("Failed to obtain an access token: {other}"),
    }
}

/// Relay a non-2xx Graph answer with its original status and body.
///
/// JSON bodies are returned as JSON; anything else as plain text.
fn relay_upstream_error(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    tracing::debug!(status = status.as_u16(), "Relaying Graph API error");

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => (status, axum::Json(json)).into_response(),
        Err(_) => (status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response(),
    }
}
