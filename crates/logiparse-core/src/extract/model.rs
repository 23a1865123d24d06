//! Delegated field extraction through an external generative model.

use serde_json::Value;
use tracing::{debug, warn};

use logiparse_model::{DocumentPayload, ExtractionRequest, ModelClient};

use crate::document::DocumentContent;
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractedRecord, LineItem, BINARY_PREVIEW};

use super::ExtractionStrategy;

/// Instruction sent with every document. The keys mirror
/// [`ExtractedRecord`] exactly.
const INSTRUCTION: &str = "Extract these fields from the logistics invoice or waybill and reply \
with a single raw JSON object, no markdown and no commentary. Keys: invoice_number, date, \
sender, receiver, total_weight, total_amount, currency, tracking_number, items. \"items\" is a \
list of objects with keys description, quantity, unit_price, line_total. Use null for any field \
not present in the document.";

/// Extractor that forwards the document to an injected [`ModelClient`] and
/// maps the JSON reply onto an [`ExtractedRecord`].
///
/// Every failure mode (transport, bad status, non-JSON reply) degrades to an
/// all-null record whose preview describes the failure; this strategy never
/// returns an error.
pub struct ModelExtractor {
    client: Box<dyn ModelClient>,
    default_currency: String,
}

impl ModelExtractor {
    /// Create an extractor around a model client.
    pub fn new(client: Box<dyn ModelClient>) -> Self {
        Self {
            client,
            default_currency: ExtractionConfig::default().default_currency,
        }
    }

    /// Create an extractor with configured defaults.
    pub fn from_config(client: Box<dyn ModelClient>, config: &ExtractionConfig) -> Self {
        Self {
            client,
            default_currency: config.default_currency.clone(),
        }
    }

    /// Strip a surrounding markdown code fence, if present.
    fn strip_code_fence(text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.starts_with("```") {
            trimmed
                .lines()
                .skip(1)
                .take_while(|line| !line.starts_with("```"))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            trimmed.to_string()
        }
    }

    fn string_field(value: &Value, key: &str) -> Option<String> {
        match value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn item_from_json(value: &Value) -> Option<LineItem> {
        let description = value.get("description")?.as_str()?.trim().to_string();
        if description.is_empty() {
            return None;
        }

        let quantity = value.get("quantity").and_then(|q| {
            q.as_i64()
                .or_else(|| q.as_str().and_then(|s| s.trim().parse().ok()))
        })?;

        Some(LineItem {
            description,
            quantity,
            unit_price: Self::string_field(value, "unit_price")?,
            line_total: Self::string_field(value, "line_total")?,
        })
    }

    /// Map a parsed JSON object onto a record with safe per-key lookups.
    /// Missing and extra keys are tolerated; malformed items are dropped.
    fn record_from_json(&self, value: &Value, preview: String) -> ExtractedRecord {
        let items = value
            .get("items")
            .and_then(|v| v.as_array())
            .map(|array| array.iter().filter_map(Self::item_from_json).collect())
            .unwrap_or_default();

        let total_amount = Self::string_field(value, "total_amount").map(|s| s.replace(',', ""));
        let currency = Self::string_field(value, "currency").or_else(|| {
            total_amount
                .is_some()
                .then(|| self.default_currency.clone())
        });

        ExtractedRecord {
            invoice_number: Self::string_field(value, "invoice_number"),
            date: Self::string_field(value, "date"),
            sender: Self::string_field(value, "sender"),
            receiver: Self::string_field(value, "receiver"),
            total_weight: Self::string_field(value, "total_weight"),
            total_amount,
            currency,
            tracking_number: Self::string_field(value, "tracking_number"),
            items,
            raw_text_preview: preview,
        }
    }
}

impl ExtractionStrategy for ModelExtractor {
    fn extract(&self, content: &DocumentContent) -> ExtractedRecord {
        let (payload, preview) = match content {
            DocumentContent::Text(text) => (
                DocumentPayload::Text(text.clone()),
                ExtractedRecord::preview_of(text),
            ),
            DocumentContent::Binary { data, mime } => (
                DocumentPayload::Binary {
                    data: data.clone(),
                    mime: mime.clone(),
                },
                BINARY_PREVIEW.to_string(),
            ),
        };

        let request = ExtractionRequest {
            payload,
            instruction: INSTRUCTION.to_string(),
        };

        let reply = match self.client.complete(&request) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("delegated extraction failed: {}", e);
                return ExtractedRecord::empty_with_preview(format!("extraction failed: {}", e));
            }
        };

        let cleaned = Self::strip_code_fence(&reply);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) if value.is_object() => {
                debug!("delegated extraction returned a JSON object");
                self.record_from_json(&value, preview)
            }
            Ok(_) => {
                warn!("model reply was valid JSON but not an object");
                ExtractedRecord::empty_with_preview(
                    "extraction failed: model returned non-object JSON",
                )
            }
            Err(e) => {
                warn!("model reply was not valid JSON: {}", e);
                ExtractedRecord::empty_with_preview(format!(
                    "extraction failed: invalid JSON from model ({})",
                    e
                ))
            }
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiparse_model::ModelError;
    use pretty_assertions::assert_eq;

    /// Deterministic stand-in for the external service.
    struct StubClient {
        reply: Result<String, ()>,
    }

    impl StubClient {
        fn replying(reply: &str) -> Box<Self> {
            Box::new(Self {
                reply: Ok(reply.to_string()),
            })
        }

        fn failing() -> Box<Self> {
            Box::new(Self { reply: Err(()) })
        }
    }

    impl ModelClient for StubClient {
        fn complete(&self, _request: &ExtractionRequest) -> logiparse_model::Result<String> {
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(()) => Err(ModelError::EmptyResponse),
            }
        }
    }

    fn text(content: &str) -> DocumentContent {
        DocumentContent::Text(content.to_string())
    }

    const FULL_REPLY: &str = r#"{
        "invoice_number": "INV-7",
        "date": "2024-02-20",
        "sender": "ABC Corp",
        "receiver": "XYZ Store",
        "total_weight": "45.5 kg",
        "total_amount": "9,500.00",
        "currency": null,
        "tracking_number": "TRK-7",
        "items": [
            {"description": "Fan Motor", "quantity": 2, "unit_price": "1500.00", "line_total": "3000.00"},
            {"description": "", "quantity": 1, "unit_price": "1.00", "line_total": "1.00"},
            {"description": "Bad Row", "quantity": "x", "unit_price": "1.00", "line_total": "1.00"}
        ],
        "confidence": 0.93
    }"#;

    #[test]
    fn test_maps_reply_onto_record() {
        let extractor = ModelExtractor::new(StubClient::replying(FULL_REPLY));
        let record = extractor.extract(&text("some invoice"));

        assert_eq!(record.invoice_number.as_deref(), Some("INV-7"));
        assert_eq!(record.total_amount.as_deref(), Some("9500.00"));
        // amount present, currency missing: the default applies
        assert_eq!(record.currency.as_deref(), Some("PHP"));
        // empty-description and unparseable-quantity rows are dropped
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, 2);
        assert_eq!(record.raw_text_preview, "some invoice");
    }

    #[test]
    fn test_fenced_reply_is_unwrapped() {
        let fenced = format!("```json\n{}\n```", r#"{"invoice_number": "INV-9"}"#);
        let extractor = ModelExtractor::new(StubClient::replying(&fenced));

        let record = extractor.extract(&text("doc"));
        assert_eq!(record.invoice_number.as_deref(), Some("INV-9"));
        assert_eq!(record.total_amount, None);
        assert_eq!(record.currency, None);
    }

    #[test]
    fn test_transport_failure_degrades_to_empty_record() {
        let extractor = ModelExtractor::new(StubClient::failing());
        let record = extractor.extract(&text("doc"));

        assert_eq!(record.invoice_number, None);
        assert_eq!(record.total_amount, None);
        assert!(record.items.is_empty());
        assert!(record.raw_text_preview.starts_with("extraction failed:"));
    }

    #[test]
    fn test_invalid_json_degrades_to_empty_record() {
        let extractor = ModelExtractor::new(StubClient::replying("I could not read that"));
        let record = extractor.extract(&text("doc"));

        assert_eq!(record, ExtractedRecord::empty_with_preview(
            record.raw_text_preview.clone(),
        ));
        assert!(record.raw_text_preview.contains("invalid JSON"));
    }

    #[test]
    fn test_non_object_json_degrades() {
        let extractor = ModelExtractor::new(StubClient::replying("[1, 2, 3]"));
        let record = extractor.extract(&text("doc"));
        assert!(record.raw_text_preview.contains("non-object JSON"));
    }

    #[test]
    fn test_missing_keys_become_none() {
        let extractor = ModelExtractor::new(StubClient::replying("{}"));
        let record = extractor.extract(&text("doc"));

        assert_eq!(record.invoice_number, None);
        assert_eq!(record.currency, None);
        assert!(record.items.is_empty());
        assert_eq!(record.raw_text_preview, "doc");
    }

    #[test]
    fn test_numeric_amount_accepted() {
        let extractor =
            ModelExtractor::new(StubClient::replying(r#"{"total_amount": 9500.5}"#));
        let record = extractor.extract(&text("doc"));
        assert_eq!(record.total_amount.as_deref(), Some("9500.5"));
        assert_eq!(record.currency.as_deref(), Some("PHP"));
    }

    #[test]
    fn test_binary_input_gets_placeholder_preview() {
        let extractor = ModelExtractor::new(StubClient::replying("{}"));
        let record = extractor.extract(&DocumentContent::Binary {
            data: vec![0u8; 8],
            mime: "image/jpeg".to_string(),
        });
        assert_eq!(record.raw_text_preview, BINARY_PREVIEW);
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(ModelExtractor::strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(
            ModelExtractor::strip_code_fence("```\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
    }
}
