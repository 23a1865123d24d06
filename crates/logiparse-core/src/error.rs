//! Error types for the logiparse-core library.

use thiserror::Error;

/// Main error type for the logiparse library.
#[derive(Error, Debug)]
pub enum LogiError {
    /// Document reading error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the delegated model service layer.
    #[error("model error: {0}")]
    Model(#[from] logiparse_model::ModelError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading input documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file extension is not one of the supported document formats.
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,
}

/// Result type for the logiparse library.
pub type Result<T> = std::result::Result<T, LogiError>;
