//! Delegated-extraction service boundary for logiparse.
//!
//! This crate defines the `ModelClient` trait that the extraction pipeline
//! talks to, plus an HTTP client for an Anthropic-style messages API that can
//! carry plain text or base64-encoded binary documents (PDF, PNG, JPEG).
//! The core crate depends on the trait only; concrete clients are injected
//! by the caller so that tests can substitute a deterministic stub.

mod anthropic;
mod error;

pub use anthropic::{api_key_from_env, AnthropicClient, ModelSettings};
pub use error::ModelError;

/// Result type for model-service operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Document payload forwarded to the model service.
#[derive(Debug, Clone)]
pub enum DocumentPayload {
    /// Plain UTF-8 text.
    Text(String),
    /// Raw document bytes with their MIME type.
    Binary { data: Vec<u8>, mime: String },
}

/// A single extraction request: one document plus the instruction that
/// describes the fields to return.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The document being processed.
    pub payload: DocumentPayload,
    /// Instruction enumerating the required output keys.
    pub instruction: String,
}

/// Trait for clients of the delegated extraction service.
///
/// Implementations perform exactly one synchronous request and return the
/// raw text of the model's reply. Parsing that reply is the caller's job.
pub trait ModelClient {
    /// Send the request and return the model's text response.
    fn complete(&self, request: &ExtractionRequest) -> Result<String>;
}
