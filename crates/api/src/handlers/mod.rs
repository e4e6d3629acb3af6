//! Request handlers.
//!
//! Handlers extract and check the caller's parameters, delegate to the
//! [`DriveProxy`](spdrive_graph::DriveProxy), and map errors via
//! [`AppError`](crate::error::AppError).

pub mod drive;
