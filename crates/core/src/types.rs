/// Opaque SharePoint drive-item identifier (folder or file).
///
/// Never interpreted locally; only threaded through Graph URL paths.
pub type ItemId = String;

/// Exclusive upper bound for a single upload, in bytes.
///
/// Graph's simple-upload endpoint is used for every file, so anything at or
/// above this size is rejected before a request is sent.
pub const MAX_UPLOAD_BYTES: u64 = 250_000_000;
