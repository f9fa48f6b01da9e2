/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Data not found: {0}")]
    DataNotFound(String),

    #[error("Insufficient data: required {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Fetch timed out after {0} ms")]
    Timeout(u64),

    #[error("Fetch task failed: {0}")]
    FetchFailed(String),

    #[error("Trade submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Position not found: {0}")]
    PositionNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
