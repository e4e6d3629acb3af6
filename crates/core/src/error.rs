/// Errors decided locally, before any upstream call.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown territory: {0}")]
    UnknownTerritory(String),

    #[error("Payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("Validation failed: {0}")]
    Validation(String),
}
