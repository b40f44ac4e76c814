//! Error types for the crate

/// Errors surfaced by network construction, persistence and dataset decoding.
///
/// Shape violations inside the forward/backward pass are not represented here:
/// they indicate a mis-wired topology and panic instead.
#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
