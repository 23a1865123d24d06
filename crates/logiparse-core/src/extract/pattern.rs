//! Deterministic pattern-based field extraction.

use tracing::{debug, info};

use crate::document::DocumentContent;
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractedRecord, LineItem};

use super::patterns::*;
use super::ExtractionStrategy;

/// Rule-based extractor: one independent case-insensitive pattern search per
/// field, first match wins.
pub struct PatternExtractor {
    default_currency: String,
    default_weight_unit: String,
    max_line_items: usize,
}

impl PatternExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            default_currency: config.default_currency.clone(),
            default_weight_unit: config.default_weight_unit.clone(),
            max_line_items: config.max_line_items,
        }
    }

    /// Set the currency assumed when none is found next to an amount.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Set the line item cap.
    pub fn with_max_line_items(mut self, max: usize) -> Self {
        self.max_line_items = max;
        self
    }

    /// Parse fields out of raw document text.
    pub fn parse(&self, text: &str) -> ExtractedRecord {
        info!("parsing {} characters of text", text.len());

        let (currency, total_amount) = match self.extract_amount(text) {
            Some((currency, amount)) => (Some(currency), Some(amount)),
            None => (None, None),
        };

        let record = ExtractedRecord {
            invoice_number: self.extract_invoice_number(text),
            date: self.extract_date(text),
            sender: self.extract_sender(text),
            receiver: self.extract_receiver(text),
            total_weight: self.extract_weight(text),
            total_amount,
            currency,
            tracking_number: self.extract_tracking_number(text),
            items: self.extract_line_items(text),
            raw_text_preview: ExtractedRecord::preview_of(text),
        };

        debug!(
            coverage = record.key_field_count(),
            items = record.items.len(),
            "pattern extraction finished"
        );

        record
    }

    fn extract_invoice_number(&self, text: &str) -> Option<String> {
        INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_date(&self, text: &str) -> Option<String> {
        DATE.captures(text).map(|caps| caps[1].trim().to_string())
    }

    fn extract_sender(&self, text: &str) -> Option<String> {
        SENDER.captures(text).map(|caps| caps[1].trim().to_string())
    }

    fn extract_receiver(&self, text: &str) -> Option<String> {
        RECEIVER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_weight(&self, text: &str) -> Option<String> {
        TOTAL_WEIGHT.captures(text).map(|caps| {
            let unit = caps
                .get(2)
                .map(|m| m.as_str())
                .unwrap_or(&self.default_weight_unit);
            format!("{} {}", caps[1].trim(), unit)
        })
    }

    fn extract_amount(&self, text: &str) -> Option<(String, String)> {
        TOTAL_AMOUNT.captures(text).map(|caps| {
            let currency = caps
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or(&self.default_currency);
            let amount = caps[2].replace(',', "");
            (currency.to_string(), amount)
        })
    }

    fn extract_tracking_number(&self, text: &str) -> Option<String> {
        TRACKING_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_line_items(&self, text: &str) -> Vec<LineItem> {
        LINE_ITEM
            .captures_iter(text)
            .take(self.max_line_items)
            .filter_map(|caps| {
                Some(LineItem {
                    description: caps[1].trim().to_string(),
                    quantity: caps[2].parse().ok()?,
                    unit_price: caps[3].replace(',', ""),
                    line_total: caps[4].replace(',', ""),
                })
            })
            .collect()
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for PatternExtractor {
    fn extract(&self, content: &DocumentContent) -> ExtractedRecord {
        match content {
            DocumentContent::Text(text) => self.parse(text),
            DocumentContent::Binary { mime, .. } => {
                debug!("pattern strategy received binary input ({})", mime);
                ExtractedRecord::empty_with_preview(format!(
                    "pattern extraction requires text input, got {}",
                    mime
                ))
            }
        }
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}
