//! Preconditions checked before a request is forwarded upstream.
//!
//! Graph enforces its own naming rules and relays them as upstream errors;
//! the checks here only cover inputs that would otherwise produce a malformed
//! URL or a request Graph cannot accept at all.

use crate::error::CoreError;

/// Reject payloads whose length is at or above `limit`.
pub fn check_upload_size(size: u64, limit: u64) -> Result<(), CoreError> {
    if size >= limit {
        return Err(CoreError::PayloadTooLarge { size, limit });
    }
    Ok(())
}

/// Validate the name of a folder to create.
pub fn validate_folder_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Folder name must not be empty".into()));
    }
    Ok(())
}

/// Validate an upload filename.
///
/// The filename becomes a single path segment, so separators are refused
/// rather than silently creating nested items.
pub fn validate_filename(filename: &str) -> Result<(), CoreError> {
    if filename.trim().is_empty() {
        return Err(CoreError::Validation("Filename must not be empty".into()));
    }
    if filename.contains(['/', '\\']) {
        return Err(CoreError::Validation(format!(
            "Filename '{filename}' must not contain path separators"
        )));
    }
    if filename.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "Filename must not contain control characters".into(),
        ));
    }
    Ok(())
}
