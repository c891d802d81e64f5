use thiserror::Error;

/// Result type local to zipview-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] zipview_core::Error),
}

/// Sources report through the core error type; I/O failures land in
/// `Source`, core errors pass through untouched.
impl From<Error> for zipview_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Core(inner) => inner,
            other => zipview_core::Error::Source(other.to_string()),
        }
    }
}
