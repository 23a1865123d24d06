//! Presence and arithmetic validation of extracted records.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::record::{ExtractedRecord, ValidationReport, ValidationStatus};

fn missing(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|value| value.is_empty())
}

fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(&raw.replace(',', ""))
}

/// Validate an extracted record.
///
/// Pure function: no I/O, deterministic, and the input is not modified.
/// Issues block a PASS status; warnings are informational only. The rules
/// run independently and findings appear in rule order.
pub fn validate(record: &ExtractedRecord) -> ValidationReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    if missing(&record.invoice_number) {
        issues.push("Invoice number not found".to_string());
    }
    if missing(&record.date) {
        warnings.push("Date not detected (may be missing or in an unusual format)".to_string());
    }
    if missing(&record.sender) {
        warnings.push("Sender/shipper not found".to_string());
    }
    if missing(&record.receiver) {
        warnings.push("Receiver/consignee not found".to_string());
    }

    match record.total_amount.as_deref().filter(|v| !v.is_empty()) {
        None => issues.push("Total amount not found".to_string()),
        Some(raw) => match parse_decimal(raw) {
            Ok(amount) if amount <= Decimal::ZERO => {
                issues.push("Total amount is zero or negative (suspicious)".to_string());
            }
            Ok(_) => {}
            Err(_) => issues.push("Total amount is not a valid number".to_string()),
        },
    }

    for item in &record.items {
        // Items with unparseable numeric fields are skipped, not reported
        let (Ok(unit_price), Ok(stated)) = (
            parse_decimal(&item.unit_price),
            parse_decimal(&item.line_total),
        ) else {
            continue;
        };

        let computed = Decimal::from(item.quantity) * unit_price;
        if (computed - stated).abs() > Decimal::new(5, 1) {
            issues.push(format!(
                "Line item '{}': quantity x unit price ({:.2}) does not match line total ({:.2})",
                item.description, computed, stated
            ));
        }
    }

    let status = if issues.is_empty() {
        ValidationStatus::Pass
    } else {
        ValidationStatus::Fail
    };

    ValidationReport {
        status,
        issues,
        warnings,
        field_coverage: format!("{}/5 key fields extracted", record.key_field_count()),
    }
}
