use thiserror::Error;

/// Top-level error type for the `vigia-core` crate.
///
/// Snapshot failures are contained at the call site — the monitor logs
/// them and carries on — so these mostly surface in logs, not to users.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backend API failure.
    #[error(transparent)]
    Api(#[from] vigia_api::Error),

    /// Snapshot file could not be read or written.
    #[error("snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded.
    #[error("snapshot encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}
