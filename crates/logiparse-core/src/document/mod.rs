//! Document reading module.

mod reader;

pub use reader::{mime_type_for, source_type_for, PdfReader};

/// Raw input handed to an extraction strategy.
#[derive(Debug, Clone)]
pub enum DocumentContent {
    /// Plain UTF-8 text.
    Text(String),
    /// Raw document bytes with their MIME type, for vision-capable
    /// strategies.
    Binary { data: Vec<u8>, mime: String },
}
