//! SharePoint site-drive operations proxied to Microsoft Graph.
//!
//! Every operation is one authenticated round trip: validate the local
//! preconditions, obtain a fresh token, send the request, and hand back the
//! upstream status and JSON body untouched. Non-2xx answers are returned as
//! [`GraphError::Upstream`] with status and body preserved.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use spdrive_core::territory::TerritoryMap;
use spdrive_core::types::MAX_UPLOAD_BYTES;
use spdrive_core::validation::{check_upload_size, validate_filename, validate_folder_name};

use crate::auth::{build_authenticator, Authenticator};
use crate::config::GraphConfig;
use crate::error::{AuthError, GraphError};

/// Name-collision policy for created folders; Graph picks a free name.
const CONFLICT_BEHAVIOR_RENAME: &str = "rename";

/// Fallback content type for uploads that do not declare one.
const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Upstream status and JSON body, relayed verbatim to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Request body for creating a folder under a parent item.
#[derive(Debug, Serialize)]
struct CreateFolderBody<'a> {
    name: &'a str,
    folder: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    conflict_behavior: &'static str,
}

/// Proxy for the default drive of one SharePoint site.
pub struct DriveProxy {
    http: reqwest::Client,
    auth: Arc<dyn Authenticator>,
    /// `{graph_base}/sites/{site}/drive`
    drive_url: Url,
    territories: TerritoryMap,
    max_upload_bytes: u64,
}

impl DriveProxy {
    pub fn new(
        http: reqwest::Client,
        auth: Arc<dyn Authenticator>,
        graph_base_url: &str,
        site_id: &str,
        territories: TerritoryMap,
    ) -> Result<Self, GraphError> {
        let mut drive_url = Url::parse(graph_base_url)
            .map_err(|e| GraphError::InvalidUrl(format!("{graph_base_url}: {e}")))?;
        drive_url
            .path_segments_mut()
            .map_err(|()| GraphError::InvalidUrl(graph_base_url.to_string()))?
            .pop_if_empty()
            .extend(["sites", site_id, "drive"]);

        Ok(Self {
            http,
            auth,
            drive_url,
            territories,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        })
    }

    /// Build the HTTP client, authenticator and proxy from configuration.
    pub fn from_config(config: &GraphConfig) -> Result<Self, GraphError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(GraphError::Request)?;
        let auth = build_authenticator(config, http.clone())?;

        Ok(Self::new(
            http,
            auth,
            &config.graph_base_url,
            &config.site_id,
            config.territories.clone(),
        )?
        .with_max_upload_bytes(config.max_upload_bytes))
    }

    /// Override the exclusive upload size limit.
    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.auth.as_ref()
    }

    pub fn territories(&self) -> &TerritoryMap {
        &self.territories
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    // ---- operations ----

    /// GET `/sites/{site}/drive`
    pub async fn list_root_drive(&self) -> Result<GraphResponse, GraphError> {
        let url = self.drive_url.clone();
        self.send("list_root_drive", self.authorized(Method::GET, url).await?)
            .await
    }

    /// GET `/sites/{site}/drive/items/{id}`
    pub async fn get_item(&self, item_id: &str) -> Result<GraphResponse, GraphError> {
        let url = self.item_url(&["items", item_id])?;
        self.send("get_item", self.authorized(Method::GET, url).await?)
            .await
    }

    /// GET `/sites/{site}/drive/items/{parent_id}/children`
    pub async fn list_children(&self, parent_id: &str) -> Result<GraphResponse, GraphError> {
        let url = self.item_url(&["items", parent_id, "children"])?;
        self.send("list_children", self.authorized(Method::GET, url).await?)
            .await
    }

    /// List the children of a territory's root folder.
    ///
    /// Unmapped names fail with `UnknownTerritory` before any token is
    /// requested.
    pub async fn resolve_territory_folder(
        &self,
        territory: &str,
    ) -> Result<GraphResponse, GraphError> {
        let folder_id = self.territories.folder_id(territory)?;
        tracing::debug!(territory, folder_id, "Resolved territory folder");
        self.list_children(folder_id).await
    }

    /// POST `/sites/{site}/drive/items/{parent_id}/children`
    ///
    /// Name collisions are left to Graph (`rename`).
    pub async fn create_folder(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<GraphResponse, GraphError> {
        validate_folder_name(name)?;
        let url = self.item_url(&["items", parent_id, "children"])?;
        let body = CreateFolderBody {
            name,
            folder: serde_json::Map::new(),
            conflict_behavior: CONFLICT_BEHAVIOR_RENAME,
        };

        let request = self.authorized(Method::POST, url).await?.json(&body);
        self.send("create_folder", request).await
    }

    /// PUT `/sites/{site}/drive/items/{parent_id}:/{filename}:/content`
    ///
    /// Payloads at or above the size limit are refused without contacting
    /// either the token endpoint or Graph.
    pub async fn upload_file(
        &self,
        parent_id: &str,
        filename: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<GraphResponse, GraphError> {
        validate_filename(filename)?;
        check_upload_size(data.len() as u64, self.max_upload_bytes)?;

        let parent_segment = format!("{parent_id}:");
        let file_segment = format!("{filename}:");
        let url = self.item_url(&["items", &parent_segment, &file_segment, "content"])?;

        let size = data.len();
        let request = self
            .authorized(Method::PUT, url)
            .await?
            .header(
                CONTENT_TYPE,
                content_type.unwrap_or(DEFAULT_UPLOAD_CONTENT_TYPE),
            )
            .body(data);

        tracing::info!(parent_id, filename, size, "Uploading file");
        self.send("upload_file", request).await
    }

    // ---- private helpers ----

    /// Append path segments to the drive URL, percent-encoding each one.
    fn item_url(&self, segments: &[&str]) -> Result<Url, GraphError> {
        let mut url = self.drive_url.clone();
        url.path_segments_mut()
            .map_err(|()| GraphError::InvalidUrl(self.drive_url.to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// Fetch a token and start a request carrying it.
    async fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, GraphError> {
        let token = self.auth.obtain_token().await?;
        if token.is_expired() {
            return Err(AuthError::Expired.into());
        }
        Ok(self.http.request(method, url).bearer_auth(token.secret()))
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<GraphResponse, GraphError> {
        let response = request.send().await.map_err(GraphError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(GraphError::from_transport)?;

        if !status.is_success() {
            tracing::warn!(operation, status = status.as_u16(), "Graph API returned an error");
            return Err(GraphError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| GraphError::MalformedResponse(e.to_string()))?
        };

        tracing::debug!(operation, status = status.as_u16(), "Graph API call succeeded");
        Ok(GraphResponse {
            status: status.as_u16(),
            body,
        })
    }
}
