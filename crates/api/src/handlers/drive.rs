//! Handlers for the drive routes.
//!
//! Each handler is a thin adapter: check the caller's parameters, run one
//! [`DriveProxy`](spdrive_graph::DriveProxy) operation, and relay the
//! upstream status and JSON body unchanged.

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use spdrive_graph::GraphResponse;

use crate::error::{AppError, AppResult};
use crate::query::{required, CreateFolderRequest, ItemParams, ParentParams, TerritoryParams};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Relay a successful Graph answer with its original status.
fn relay(response: GraphResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (status, Json(response.body)).into_response()
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// GET /top-level
///
/// Metadata of the site's default drive.
pub async fn top_level(State(state): State<AppState>) -> AppResult<Response> {
    let response = state.drive.list_root_drive().await?;
    Ok(relay(response))
}

/// GET /client-folder?territory=
///
/// Children of the territory's root folder. Unknown territories are 404.
pub async fn client_folder(
    State(state): State<AppState>,
    Query(params): Query<TerritoryParams>,
) -> AppResult<Response> {
    let territory = required(params.territory, "territory")?;
    let response = state.drive.resolve_territory_folder(&territory).await?;
    Ok(relay(response))
}

/// GET /folder?id=
pub async fn get_folder(
    State(state): State<AppState>,
    Query(params): Query<ItemParams>,
) -> AppResult<Response> {
    let id = required(params.id, "id")?;
    let response = state.drive.get_item(&id).await?;
    Ok(relay(response))
}

/// GET /folder-children?parentId=
pub async fn folder_children(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
) -> AppResult<Response> {
    let parent_id = required(params.parent_id, "parentId")?;
    let response = state.drive.list_children(&parent_id).await?;
    Ok(relay(response))
}

/// POST /folder?parentId=
///
/// Body: `{ "name": "..." }`. Name collisions are resolved by Graph, which
/// renames the new folder.
pub async fn create_folder(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
    body: Result<Json<CreateFolderRequest>, JsonRejection>,
) -> AppResult<Response> {
    let parent_id = required(params.parent_id, "parentId")?;
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let name = required(body.name, "name")?;

    tracing::info!(parent_id = %parent_id, name = %name, "Creating folder");
    let response = state.drive.create_folder(&parent_id, &name).await?;
    Ok(relay(response))
}

/// POST /file?parentId=
///
/// Multipart body with a single `file` field; the part's filename becomes the
/// drive item name. Unknown fields are ignored.
pub async fn upload_file(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let parent_id = required(params.parent_id, "parentId")?;
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut file: Option<(String, Option<String>, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("The 'file' field must have a filename".into()))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        file = Some((filename, content_type, data));
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let response = state
        .drive
        .upload_file(&parent_id, &filename, data, content_type.as_deref())
        .await?;
    Ok(relay(response))
}
