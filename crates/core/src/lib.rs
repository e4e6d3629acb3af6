//! Domain rules for the SharePoint drive proxy.
//!
//! Nothing in this crate performs I/O. It holds the pieces of the proxy that
//! are decided locally before any upstream call is made: the territory table,
//! upload size limits, and name validation.

pub mod error;
pub mod territory;
pub mod types;
pub mod validation;
