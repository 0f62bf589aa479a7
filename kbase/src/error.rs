use thiserror::Error;

/// Errors surfaced by the platform clients. Nothing here is retried:
/// any failure aborts the operation that triggered it.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-success HTTP status with no usable error body.
    #[error("http status {status}")]
    Http { status: u16 },

    /// Error reported by the service itself, message verbatim.
    #[error("{0}")]
    Service(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Deployment configuration problems (missing env, file, section or key).
    #[error("{0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
