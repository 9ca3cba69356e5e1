//! Error handling for the resume ranker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid Google Drive URL format: {0}")]
    InvalidReference(String),

    #[error("Drive request failed: {0}")]
    Gateway(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("No text found in file: {0}")]
    EmptyText(String),

    #[error("Please run a match before exporting results")]
    ExportPrecondition,

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, RankerError>;

/// Convert anyhow errors from model loading into our error type
impl From<anyhow::Error> for RankerError {
    fn from(err: anyhow::Error) -> Self {
        RankerError::ModelError(err.to_string())
    }
}

impl From<reqwest::Error> for RankerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RankerError::Gateway(format!("request timed out: {}", err))
        } else {
            RankerError::Gateway(err.to_string())
        }
    }
}
