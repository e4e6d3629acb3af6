//! Client-credentials grant with a shared secret.

use std::fmt;

use async_trait::async_trait;

use super::{AccessToken, AuthMode, Authenticator, TokenEndpoint, GRAPH_SCOPE};
use crate::error::AuthError;

pub struct ClientSecretAuthenticator {
    endpoint: TokenEndpoint,
    client_id: String,
    client_secret: String,
}

impl ClientSecretAuthenticator {
    pub fn new(endpoint: TokenEndpoint, client_id: String, client_secret: String) -> Self {
        Self {
            endpoint,
            client_id,
            client_secret,
        }
    }
}

impl fmt::Debug for ClientSecretAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretAuthenticator")
            .field("endpoint", &self.endpoint.url())
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for ClientSecretAuthenticator {
    fn mode(&self) -> AuthMode {
        AuthMode::ClientSecret
    }

    async fn obtain_token(&self) -> Result<AccessToken, AuthError> {
        self.endpoint
            .request(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
            ])
            .await
    }
}
