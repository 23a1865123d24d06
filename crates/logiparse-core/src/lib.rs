//! Core library for logistics invoice and waybill extraction.
//!
//! This crate provides:
//! - Document reading (inline text, PDF text extraction, binary payloads)
//! - Field extraction via deterministic pattern rules or a delegated model
//! - Arithmetic and presence validation of extracted records
//! - A pipeline that sequences reading, extraction, and validation into a
//!   single result envelope

pub mod document;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod validate;

pub use document::{DocumentContent, PdfReader};
pub use error::{DocumentError, LogiError, Result};
pub use extract::{ExtractionStrategy, ModelExtractor, PatternExtractor};
pub use models::config::{ExtractionConfig, LogiConfig, ModelConfig};
pub use models::record::{
    EnvelopeMetadata, ExtractedRecord, LineItem, ResultEnvelope, SourceType, ValidationReport,
    ValidationStatus,
};
pub use pipeline::{Pipeline, StrategyChoice};
pub use validate::validate;

/// Re-export model-service types.
pub use logiparse_model::{
    api_key_from_env, AnthropicClient, DocumentPayload, ExtractionRequest, ModelClient, ModelError,
    ModelSettings,
};
