use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Column index {index} out of range (column count {count})")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("Source index {index} out of range (source count {count})")]
    SourceOutOfRange { index: usize, count: usize },

    #[error("Column {0} is not active in this cursor")]
    InactiveColumn(usize),

    #[error("Type mismatch on column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    // Core does not do I/O; source crates map their own failures into this
    // variant at the `TabularSource` boundary.
    #[error("Source error: {0}")]
    Source(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    /// Shorthand used by every range check over a column namespace.
    pub fn column_out_of_range(index: usize, count: usize) -> Self {
        Error::ColumnOutOfRange { index, count }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Schema(e.to_string())
    }
}
