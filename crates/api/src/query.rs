//! Query parameter and body types for the drive routes.
//!
//! Required values are still `Option` here so a missing parameter produces
//! the standard JSON error body instead of axum's plain-text rejection.

use serde::Deserialize;

use crate::error::AppError;

/// `?territory=`
#[derive(Debug, Deserialize)]
pub struct TerritoryParams {
    pub territory: Option<String>,
}

/// `?id=`
#[derive(Debug, Deserialize)]
pub struct ItemParams {
    pub id: Option<String>,
}

/// `?parentId=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentParams {
    pub parent_id: Option<String>,
}

/// JSON body of `POST /folder`.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: Option<String>,
}

/// Unwrap a required, non-blank parameter.
pub fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required parameter '{name}'")))
}
