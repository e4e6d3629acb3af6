use spdrive_core::error::CoreError;

/// Failure to obtain a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token endpoint could not be reached (DNS, TLS, connection reset...).
    #[error("Token endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The token endpoint did not answer within the upstream timeout.
    #[error("Token endpoint timed out")]
    Timeout,

    /// The token endpoint answered with a non-2xx status.
    #[error("Token endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// A 2xx answer whose body is not a usable token payload.
    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    /// The configured private key could not be loaded or used for signing.
    #[error("Client assertion signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint handed out a token that has already expired.
    #[error("Access token expired before use")]
    Expired,
}

impl AuthError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Unreachable(err)
        }
    }

    /// Whether a single retry could plausibly succeed.
    ///
    /// Credential rejections (4xx other than 429) are final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Errors surfaced by [`DriveProxy`](crate::drive::DriveProxy) operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A local precondition failed; nothing was sent upstream.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No bearer token could be obtained; nothing was sent to Graph.
    #[error("Authentication failed: {0}")]
    Auth(AuthError),

    /// Graph answered with a non-2xx status. Status and body are kept as-is.
    #[error("Graph API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// An upstream call exceeded the configured timeout.
    #[error("Upstream call to {endpoint} timed out")]
    Timeout { endpoint: &'static str },

    /// Graph could not be reached.
    #[error("Graph API unreachable: {0}")]
    Request(#[source] reqwest::Error),

    /// Graph answered 2xx with a body that is not JSON.
    #[error("Malformed Graph response: {0}")]
    MalformedResponse(String),

    /// The configured Graph base URL cannot carry path segments.
    #[error("Invalid Graph URL: {0}")]
    InvalidUrl(String),
}

impl GraphError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: "Graph API",
            }
        } else {
            Self::Request(err)
        }
    }
}

impl From<AuthError> for GraphError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Timeout => Self::Timeout {
                endpoint: "token endpoint",
            },
            other => Self::Auth(other),
        }
    }
}
