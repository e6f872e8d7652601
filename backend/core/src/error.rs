use thiserror::Error;

/// Top-level error type for the bridge runtime.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown presence: {0}")]
    UnknownPresence(String),

    #[error("no such target: {0}")]
    UnknownTarget(u64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
