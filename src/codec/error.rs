use thiserror::Error;

use crate::codec::ROW_PREFIX_LEN;

/// Failure to decode a single row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("row has {found} fields, at least {} are required", ROW_PREFIX_LEN)]
    TooShort { found: usize },
    #[error("column {index} ({field}) is not a number: {value:?}")]
    NumberFormat {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("malformed tagged column: {token:?}")]
    MalformedTag { token: String },
}

/// Errors produced by [`parse`](crate::codec::parse) and
/// [`serialize`](crate::codec::serialize).
#[derive(Debug, Error)]
pub enum CodecError {
    /// A row failed to decode; the whole parse is abandoned.
    #[error("line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: RowError,
    },
    #[error("cannot serialize an empty detection set")]
    EmptyInput,
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialized rows are not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}
