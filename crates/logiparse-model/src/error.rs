//! Error types for the model-service layer.

use thiserror::Error;

/// Errors that can occur when calling the delegated extraction service.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The HTTP request could not be sent or completed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response contained no usable text block.
    #[error("service returned an empty response")]
    EmptyResponse,

    /// No API key was found in the environment.
    #[error("no API key set (expected LOGIPARSE_API_KEY or ANTHROPIC_API_KEY)")]
    MissingApiKey,
}
