use thiserror::Error;

pub type Result<T> = std::result::Result<T, JobSearchError>;

#[derive(Debug, Error)]
pub enum JobSearchError {
    /// Caller-supplied arguments violated the tool schema; one entry per
    /// violated field, `field: constraint` form.
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
