//! File dispatch and PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::DocumentError;
use crate::models::record::SourceType;

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Map a file extension to the declared source kind.
///
/// Only `.pdf`, `.png`, `.jpg`, and `.jpeg` are supported; anything else is
/// an [`DocumentError::UnsupportedFormat`].
pub fn source_type_for(path: &Path) -> Result<SourceType, DocumentError> {
    match extension_of(path).as_str() {
        "pdf" => Ok(SourceType::Pdf),
        "png" | "jpg" | "jpeg" => Ok(SourceType::Image),
        other => Err(DocumentError::UnsupportedFormat(other.to_string())),
    }
}

/// MIME type for a supported file.
pub fn mime_type_for(path: &Path) -> Result<&'static str, DocumentError> {
    match extension_of(path).as_str() {
        "pdf" => Ok("application/pdf"),
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        other => Err(DocumentError::UnsupportedFormat(other.to_string())),
    }
}

/// Embedded-text reader for PDF documents.
///
/// Structural problems (unreadable file, encryption without an empty
/// password) are errors; a well-formed PDF without a text layer extracts to
/// an empty string instead.
pub struct PdfReader {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfReader {
    /// Create a new reader with no document loaded.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<(), DocumentError> {
        let mut doc =
            Document::load_mem(data).map_err(|e| DocumentError::PdfParse(e.to_string()))?;

        // Handle PDFs with empty-password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DocumentError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted).map_err(|e| {
                DocumentError::PdfParse(format!("failed to save decrypted PDF: {}", e))
            })?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        debug!("loaded PDF with {} pages", doc.get_pages().len());
        self.document = Some(doc);
        Ok(())
    }

    /// Number of pages in the loaded document.
    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Extract the embedded text, pages concatenated in page order.
    pub fn extract_text(&self) -> String {
        if self.page_count() == 0 {
            return String::new();
        }

        pdf_extract::extract_text_from_mem(&self.raw_data).unwrap_or_else(|e| {
            debug!("PDF text extraction failed: {}", e);
            String::new()
        })
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
