//! Pipeline orchestration: read, extract, validate, envelope.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use logiparse_model::ModelClient;

use crate::document::{self, DocumentContent, PdfReader};
use crate::error::{LogiError, Result};
use crate::extract::{ExtractionStrategy, ModelExtractor, PatternExtractor};
use crate::models::config::{ExtractionConfig, LogiConfig};
use crate::models::record::{ExtractedRecord, ResultEnvelope, SourceType};
use crate::validate::validate;

/// Which extraction strategy to use for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    /// Text and PDF input use pattern rules; images use the model.
    #[default]
    Auto,
    /// Deterministic pattern rules only.
    Pattern,
    /// Delegated model extraction.
    Model,
}

/// Sequences Document Reader, Field Extractor, and Validator into one
/// result envelope.
///
/// Extraction failures are absorbed by the strategies (see
/// [`ExtractionStrategy`]), so for a readable input the pipeline always
/// terminates with an envelope; only unreadable or unsupported input and
/// strategy misconfiguration surface as errors.
pub struct Pipeline {
    extraction: ExtractionConfig,
    pattern: PatternExtractor,
    model: Option<ModelExtractor>,
}

impl Pipeline {
    /// Pipeline with default configuration and no model client.
    pub fn new() -> Self {
        Self::from_config(&LogiConfig::default())
    }

    /// Pipeline from configuration, pattern strategy only.
    pub fn from_config(config: &LogiConfig) -> Self {
        Self {
            extraction: config.extraction.clone(),
            pattern: PatternExtractor::from_config(&config.extraction),
            model: None,
        }
    }

    /// Attach a delegated model client, enabling the model strategy.
    pub fn with_model_client(mut self, client: Box<dyn ModelClient>) -> Self {
        self.model = Some(ModelExtractor::from_config(client, &self.extraction));
        self
    }

    fn require_model(&self) -> Result<&ModelExtractor> {
        self.model.as_ref().ok_or_else(|| {
            LogiError::Config("no model client configured for delegated extraction".to_string())
        })
    }

    /// Process pasted or piped text.
    pub fn process_text(&self, text: &str, choice: StrategyChoice) -> Result<ResultEnvelope> {
        let content = DocumentContent::Text(text.to_string());

        let record = match choice {
            StrategyChoice::Model => self.require_model()?.extract(&content),
            StrategyChoice::Auto | StrategyChoice::Pattern => self.pattern.extract(&content),
        };

        Ok(self.finish(record, SourceType::Text))
    }

    /// Process a PDF or image file, dispatching on its extension.
    pub fn process_file(&self, path: &Path, choice: StrategyChoice) -> Result<ResultEnvelope> {
        let source_type = document::source_type_for(path)?;
        debug!(path = %path.display(), %source_type, "processing file");

        let record = match (source_type, choice) {
            (SourceType::Pdf, StrategyChoice::Auto | StrategyChoice::Pattern) => {
                let data = fs::read(path)?;
                let mut reader = PdfReader::new();
                reader.load(&data)?;
                let text = reader.extract_text();
                self.pattern.extract(&DocumentContent::Text(text))
            }
            (SourceType::Pdf | SourceType::Image, StrategyChoice::Model)
            | (SourceType::Image, StrategyChoice::Auto) => {
                let model = self.require_model()?;
                let mime = document::mime_type_for(path)?;
                let data = fs::read(path)?;
                model.extract(&DocumentContent::Binary {
                    data,
                    mime: mime.to_string(),
                })
            }
            (SourceType::Image, StrategyChoice::Pattern) => {
                return Err(LogiError::Config(
                    "the pattern strategy cannot process image input".to_string(),
                ));
            }
            // Plain text never arrives through a file path
            (SourceType::Text, _) => {
                return Err(LogiError::Config(
                    "text input must be passed directly, not as a file".to_string(),
                ));
            }
        };

        Ok(self.finish(record, source_type))
    }

    fn finish(&self, record: ExtractedRecord, source_type: SourceType) -> ResultEnvelope {
        let report = validate(&record);
        info!(
            status = %report.status,
            coverage = %report.field_coverage,
            "pipeline finished"
        );
        ResultEnvelope::new(record, report, source_type)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ValidationStatus;
    use logiparse_model::{ExtractionRequest, ModelError};
    use pretty_assertions::assert_eq;

    struct StubClient {
        reply: Option<String>,
    }

    impl ModelClient for StubClient {
        fn complete(&self, _request: &ExtractionRequest) -> logiparse_model::Result<String> {
            self.reply.clone().ok_or(ModelError::EmptyResponse)
        }
    }

    const SAMPLE: &str = "\
Invoice No: INV-2024-00892
Date: February 20, 2024
From: ABC Warehousing Corp.
To: XYZ Retail Store
Total Amount: PHP 9,500.00";

    #[test]
    fn test_text_pipeline_produces_envelope() {
        let envelope = Pipeline::new()
            .process_text(SAMPLE, StrategyChoice::Auto)
            .unwrap();

        assert_eq!(envelope.metadata.source_type, SourceType::Text);
        assert_eq!(
            envelope.extracted_data.invoice_number.as_deref(),
            Some("INV-2024-00892")
        );
        assert_eq!(envelope.validation_report.status, ValidationStatus::Pass);
        assert_eq!(
            envelope.validation_report.field_coverage,
            "5/5 key fields extracted"
        );
        assert!(envelope.metadata.processed_at <= chrono::Utc::now());
    }

    #[test]
    fn test_model_choice_without_client_is_an_error() {
        let err = Pipeline::new()
            .process_text(SAMPLE, StrategyChoice::Model)
            .unwrap_err();
        assert!(matches!(err, LogiError::Config(_)));
    }

    #[test]
    fn test_failing_model_still_yields_envelope() {
        let pipeline = Pipeline::new().with_model_client(Box::new(StubClient { reply: None }));
        let envelope = pipeline
            .process_text("some document", StrategyChoice::Model)
            .unwrap();

        assert_eq!(envelope.validation_report.status, ValidationStatus::Fail);
        assert_eq!(
            envelope.validation_report.issues,
            vec![
                "Invoice number not found".to_string(),
                "Total amount not found".to_string(),
            ]
        );
        assert_eq!(envelope.validation_report.warnings.len(), 3);
        assert_eq!(
            envelope.validation_report.field_coverage,
            "0/5 key fields extracted"
        );
    }

    #[test]
    fn test_auto_prefers_pattern_for_text_even_with_model() {
        let pipeline = Pipeline::new().with_model_client(Box::new(StubClient {
            reply: Some(r#"{"invoice_number": "FROM-MODEL"}"#.to_string()),
        }));

        let envelope = pipeline.process_text(SAMPLE, StrategyChoice::Auto).unwrap();
        assert_eq!(
            envelope.extracted_data.invoice_number.as_deref(),
            Some("INV-2024-00892")
        );
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = Pipeline::new()
            .process_file(Path::new("order.docx"), StrategyChoice::Auto)
            .unwrap_err();
        assert!(matches!(
            err,
            LogiError::Document(crate::error::DocumentError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_image_with_pattern_choice_is_rejected() {
        let err = Pipeline::new()
            .process_file(Path::new("scan.png"), StrategyChoice::Pattern)
            .unwrap_err();
        assert!(matches!(err, LogiError::Config(_)));
    }

    #[test]
    fn test_image_file_goes_through_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waybill.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let pipeline = Pipeline::new().with_model_client(Box::new(StubClient {
            reply: Some(
                r#"{"invoice_number": "INV-1", "total_amount": "100.00"}"#.to_string(),
            ),
        }));

        let envelope = pipeline.process_file(&path, StrategyChoice::Auto).unwrap();
        assert_eq!(envelope.metadata.source_type, SourceType::Image);
        assert_eq!(
            envelope.extracted_data.invoice_number.as_deref(),
            Some("INV-1")
        );
        assert_eq!(envelope.extracted_data.currency.as_deref(), Some("PHP"));
        assert_eq!(
            envelope.extracted_data.raw_text_preview,
            crate::models::record::BINARY_PREVIEW
        );
    }
}
