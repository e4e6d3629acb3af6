//! Bearer-token acquisition for Microsoft Graph.
//!
//! Two strategies share the tenant token endpoint:
//!
//! - [`client_secret`] -- OAuth2 client-credentials grant with a shared secret.
//! - [`assertion`] -- client-credentials grant authenticated by a short-lived
//!   PS256 assertion signed with the application's certificate key.
//!
//! The strategy is picked once at startup ([`build_authenticator`]) and used
//! through the [`Authenticator`] trait. Tokens are fetched per call and never
//! cached.

pub mod assertion;
pub mod client_secret;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Credential, GraphConfig};
use crate::error::AuthError;

pub use assertion::CertificateAuthenticator;
pub use client_secret::ClientSecretAuthenticator;

/// The only scope ever requested: application permissions on Graph.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Delay before the single retry of a transient token-endpoint failure.
const TOKEN_RETRY_DELAY: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// A bearer token and the instant it stops being valid.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(
        secret: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            secret: secret.into(),
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// The raw bearer string for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint success payload (Microsoft identity platform v2.0).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

// ---------------------------------------------------------------------------
// Authenticator strategy
// ---------------------------------------------------------------------------

/// How the application proves its identity to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    ClientSecret,
    Certificate,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientSecret => "client_secret",
            Self::Certificate => "certificate",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a fresh bearer token for Graph.
#[async_trait]
pub trait Authenticator: Send + Sync {
    fn mode(&self) -> AuthMode;

    /// Obtain a new access token. Never returns a cached token.
    async fn obtain_token(&self) -> Result<AccessToken, AuthError>;
}

/// Build the configured authenticator strategy.
///
/// Certificate keys are parsed here so a bad key fails at startup rather than
/// on the first request.
pub fn build_authenticator(
    config: &GraphConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn Authenticator>, AuthError> {
    let endpoint = TokenEndpoint::for_tenant(http, &config.authority_host, &config.tenant);

    let authenticator: Arc<dyn Authenticator> = match &config.credential {
        Credential::ClientSecret(secret) => Arc::new(ClientSecretAuthenticator::new(
            endpoint,
            config.client_id.clone(),
            secret.clone(),
        )),
        Credential::Certificate {
            private_key_pem,
            thumbprint,
        } => Arc::new(CertificateAuthenticator::new(
            endpoint,
            config.client_id.clone(),
            private_key_pem,
            thumbprint,
            config.token_audience.clone(),
        )?),
    };

    tracing::info!(mode = %authenticator.mode(), "Authenticator configured");
    Ok(authenticator)
}

// ---------------------------------------------------------------------------
// Token endpoint
// ---------------------------------------------------------------------------

/// The tenant's OAuth2 v2.0 token endpoint.
#[derive(Debug, Clone)]
pub struct TokenEndpoint {
    http: reqwest::Client,
    url: String,
}

impl TokenEndpoint {
    /// `{authority_host}/{tenant}/oauth2/v2.0/token`.
    pub fn for_tenant(http: reqwest::Client, authority_host: &str, tenant: &str) -> Self {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority_host.trim_end_matches('/'),
            tenant
        );
        Self { http, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the form, retrying once if the failure looks transient.
    pub async fn request(&self, form: &[(&str, &str)]) -> Result<AccessToken, AuthError> {
        match self.try_request(form).await {
            Err(err) if err.is_transient() => {
                tracing::warn!(error = %err, "Token request failed, retrying once");
                tokio::time::sleep(TOKEN_RETRY_DELAY).await;
                self.try_request(form).await
            }
            other => other,
        }
    }

    async fn try_request(&self, form: &[(&str, &str)]) -> Result<AccessToken, AuthError> {
        let response = self
            .http
            .post(&self.url)
            .form(form)
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AuthError::from_transport)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token endpoint rejected the request");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
        if payload.access_token.is_empty() {
            return Err(AuthError::MalformedResponse("empty access_token".into()));
        }

        let expires_at = chrono::TimeDelta::try_seconds(payload.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::MalformedResponse("expires_in out of range".into()))?;

        tracing::debug!(expires_in = payload.expires_in, "Access token obtained");
        Ok(AccessToken::new(
            payload.access_token,
            payload.token_type,
            expires_at,
        ))
    }
}
