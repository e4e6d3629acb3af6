//! Microsoft Graph client for SharePoint site drives.
//!
//! - [`auth`] -- bearer-token acquisition (client secret or signed assertion).
//! - [`drive`] -- the drive operations proxied to Graph.
//! - [`config`] -- credentials and endpoint configuration.

pub mod auth;
pub mod config;
pub mod drive;
pub mod error;

pub use auth::{AccessToken, AuthMode, Authenticator};
pub use config::GraphConfig;
pub use drive::{DriveProxy, GraphResponse};
pub use error::{AuthError, GraphError};
