use crate::cipher::Operation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunebreakError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown glyph at position {position}: '{snippet}'")]
    UnknownGlyph { position: usize, snippet: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Operation {0} is not invertible over a {1}-symbol alphabet")]
    NonInvertible(Operation, usize),
}

pub type RbResult<T> = Result<T, RunebreakError>;
