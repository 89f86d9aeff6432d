use thiserror::Error;

/// Result type local to relops-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad header cell '{cell}': expected name:type")]
    Header { cell: String },

    #[error("row {row}, field '{field}': cannot parse '{text}' as {expected}")]
    Parse {
        row: usize,
        field: String,
        text: String,
        expected: relops_core::schema::DataType,
    },

    #[error(transparent)]
    Core(#[from] relops_core::Error),
}
