//! Extraction result models: the extracted record, validation report, and
//! the envelope returned by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters kept in `raw_text_preview`.
pub const PREVIEW_CHARS: usize = 300;

/// Preview placeholder used for binary (vision) inputs, where no source text
/// exists.
pub const BINARY_PREVIEW: &str = "[binary document: no text preview]";

/// The structured result of extracting fields from one document.
///
/// All fields except `items` and `raw_text_preview` are optional: an
/// extractor that finds nothing produces a record of `None`s, which the
/// validator then reports against. Values are stored as the free-form
/// strings found in the document, not normalized to calendar or money types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Invoice identifier, e.g. "INV-2024-00892".
    pub invoice_number: Option<String>,

    /// Document date, stored verbatim as matched.
    pub date: Option<String>,

    /// Sender / shipper / consignor, single line.
    pub sender: Option<String>,

    /// Receiver / consignee, single line.
    pub receiver: Option<String>,

    /// Total shipment weight as "<number> <unit>", e.g. "45.5 kg".
    pub total_weight: Option<String>,

    /// Total amount as a decimal string with thousands separators stripped.
    pub total_amount: Option<String>,

    /// Currency code or symbol; defaults to the configured currency when an
    /// amount was found without one.
    pub currency: Option<String>,

    /// Tracking or waybill number.
    pub tracking_number: Option<String>,

    /// Line items in document order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// First [`PREVIEW_CHARS`] characters of the source text, a placeholder
    /// for binary inputs, or a failure description when delegated
    /// extraction degraded.
    #[serde(default)]
    pub raw_text_preview: String,
}

impl ExtractedRecord {
    /// An all-null record carrying only a preview string.
    pub fn empty_with_preview(preview: impl Into<String>) -> Self {
        Self {
            raw_text_preview: preview.into(),
            ..Self::default()
        }
    }

    /// Build the preview for a text source: the first [`PREVIEW_CHARS`]
    /// characters, with an ellipsis when truncated.
    pub fn preview_of(text: &str) -> String {
        if text.chars().count() > PREVIEW_CHARS {
            let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", truncated)
        } else {
            text.to_string()
        }
    }

    /// Count how many of the five key fields (invoice number, date, sender,
    /// receiver, total amount) are present and non-empty.
    pub fn key_field_count(&self) -> usize {
        [
            &self.invoice_number,
            &self.date,
            &self.sender,
            &self.receiver,
            &self.total_amount,
        ]
        .iter()
        .filter(|field| field.as_deref().is_some_and(|value| !value.is_empty()))
        .count()
    }
}

/// One row of a document describing a shipped good.
///
/// `quantity * unit_price ≈ line_total` is a checked invariant: the
/// validator reports violations beyond a 0.5 absolute tolerance but the
/// model does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description.
    pub description: String,

    /// Quantity shipped.
    pub quantity: i64,

    /// Per-unit price as a decimal string.
    pub unit_price: String,

    /// Stated total for the line as a decimal string.
    pub line_total: String,
}

/// Declared kind of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceType {
    /// Pasted or piped plain text.
    Text,
    /// PDF file.
    Pdf,
    /// PNG or JPEG image file.
    Image,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Text => write!(f, "TEXT"),
            SourceType::Pdf => write!(f, "PDF"),
            SourceType::Image => write!(f, "IMAGE"),
        }
    }
}

/// Overall verdict of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    /// No issues found; warnings may still be present.
    Pass,
    /// At least one issue found; the record should be treated as unreliable.
    Fail,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "PASS"),
            ValidationStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Findings produced by validating one [`ExtractedRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// FAIL iff `issues` is non-empty.
    pub status: ValidationStatus,

    /// Blocking findings, in rule order.
    pub issues: Vec<String>,

    /// Informational findings; never affect `status`.
    pub warnings: Vec<String>,

    /// "N/5 key fields extracted".
    pub field_coverage: String,
}

impl ValidationReport {
    /// Whether validation passed.
    pub fn is_pass(&self) -> bool {
        self.status == ValidationStatus::Pass
    }
}

/// Metadata attached to every pipeline result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    /// Timestamp captured at envelope construction.
    pub processed_at: DateTime<Utc>,

    /// Declared kind of the input.
    pub source_type: SourceType,
}

/// The complete output of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Processing metadata.
    pub metadata: EnvelopeMetadata,

    /// The extracted record.
    pub extracted_data: ExtractedRecord,

    /// Validation findings for the record.
    pub validation_report: ValidationReport,
}

impl ResultEnvelope {
    /// Assemble an envelope, stamping the current time.
    pub fn new(
        extracted_data: ExtractedRecord,
        validation_report: ValidationReport,
        source_type: SourceType,
    ) -> Self {
        Self {
            metadata: EnvelopeMetadata {
                processed_at: Utc::now(),
                source_type,
            },
            extracted_data,
            validation_report,
        }
    }

    /// Pretty-printed JSON export with `raw_text_preview` removed from the
    /// extracted data.
    pub fn to_export_json(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(data) = value
            .get_mut("extracted_data")
            .and_then(|v| v.as_object_mut())
        {
            data.remove("raw_text_preview");
        }
        serde_json::to_string_pretty(&value)
    }
}
