use std::sync::Arc;

use spdrive_graph::DriveProxy;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable and read-only: the configuration and the drive
/// proxy are built once at startup and shared behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Graph drive proxy with the authenticator chosen at startup.
    pub drive: Arc<DriveProxy>,
}
