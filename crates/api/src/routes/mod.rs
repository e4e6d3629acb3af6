pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::drive;
use crate::state::AppState;

/// Build the drive route tree.
///
/// Route hierarchy:
///
/// ```text
/// /top-level                          site drive metadata (GET)
/// /client-folder?territory=           territory folder children (GET)
/// /folder?id=                         drive item metadata (GET)
/// /folder?parentId=                   create folder, JSON {"name"} (POST)
/// /folder-children?parentId=          folder children (GET)
/// /file?parentId=                     upload, multipart field "file" (POST)
/// ```
pub fn drive_routes() -> Router<AppState> {
    Router::new()
        .route("/top-level", get(drive::top_level))
        .route("/client-folder", get(drive::client_folder))
        .route(
            "/folder",
            get(drive::get_folder).post(drive::create_folder),
        )
        .route("/folder-children", get(drive::folder_children))
        .route("/file", post(drive::upload_file))
}
