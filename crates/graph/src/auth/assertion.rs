//! Client-credentials grant authenticated by a signed JWT assertion.
//!
//! Instead of a shared secret the application presents a short-lived token
//! signed with its certificate's private key:
//!
//! - header: `alg = PS256`, `x5t` = base64url SHA-1 certificate thumbprint
//! - claims: `iss = sub = client_id`, `aud` = token endpoint, fresh `jti`,
//!   `nbf = now`, `exp = now + 120s`
//!
//! A new assertion is signed for every token request.

use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccessToken, AuthMode, Authenticator, TokenEndpoint, GRAPH_SCOPE};
use crate::error::AuthError;

/// Lifetime of a signed assertion, in seconds.
pub const ASSERTION_LIFETIME_SECS: i64 = 120;

/// `client_assertion_type` value for JWT-bearer client authentication.
pub const JWT_BEARER_ASSERTION_TYPE: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Length of a hex-encoded SHA-1 digest.
const HEX_SHA1_LEN: usize = 40;

/// Claims of a client assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    /// Unique per assertion (UUID v4) so the endpoint can reject replays.
    pub jti: String,
    /// Not-before (UTC Unix timestamp).
    pub nbf: i64,
    /// Expiration (UTC Unix timestamp), always `nbf + 120`.
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(client_id: &str, audience: &str, now: i64) -> Self {
        Self {
            aud: audience.to_string(),
            iss: client_id.to_string(),
            sub: client_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            nbf: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Convert a certificate thumbprint to the `x5t` header form.
///
/// A 40-character hex SHA-1 thumbprint (the form Azure displays) is decoded
/// and re-encoded as unpadded base64url. Anything else is assumed to already
/// be in `x5t` form and is returned trimmed.
pub fn x5t_from_thumbprint(thumbprint: &str) -> String {
    let thumbprint = thumbprint.trim();
    if thumbprint.len() == HEX_SHA1_LEN {
        if let Ok(digest) = hex::decode(thumbprint) {
            return URL_SAFE_NO_PAD.encode(digest);
        }
    }
    thumbprint.to_string()
}

pub struct CertificateAuthenticator {
    endpoint: TokenEndpoint,
    client_id: String,
    audience: String,
    x5t: String,
    key: EncodingKey,
}

impl CertificateAuthenticator {
    /// `audience` defaults to the token endpoint URL.
    pub fn new(
        endpoint: TokenEndpoint,
        client_id: String,
        private_key_pem: &str,
        thumbprint: &str,
        audience: Option<String>,
    ) -> Result<Self, AuthError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
        let audience = audience.unwrap_or_else(|| endpoint.url().to_string());

        Ok(Self {
            endpoint,
            client_id,
            audience,
            x5t: x5t_from_thumbprint(thumbprint),
            key,
        })
    }

    /// Sign a fresh assertion valid from now for [`ASSERTION_LIFETIME_SECS`].
    pub fn sign_assertion(&self) -> Result<String, AuthError> {
        self.sign_assertion_at(chrono::Utc::now().timestamp())
    }

    pub fn sign_assertion_at(&self, now: i64) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::PS256);
        header.x5t = Some(self.x5t.clone());

        let claims = AssertionClaims::new(&self.client_id, &self.audience, now);
        Ok(encode(&header, &claims, &self.key)?)
    }
}

impl fmt::Debug for CertificateAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateAuthenticator")
            .field("endpoint", &self.endpoint.url())
            .field("client_id", &self.client_id)
            .field("audience", &self.audience)
            .field("x5t", &self.x5t)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for CertificateAuthenticator {
    fn mode(&self) -> AuthMode {
        AuthMode::Certificate
    }

    async fn obtain_token(&self) -> Result<AccessToken, AuthError> {
        let assertion = self.sign_assertion()?;
        self.endpoint
            .request(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_assertion_type", JWT_BEARER_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
                ("scope", GRAPH_SCOPE),
            ])
            .await
    }
}
