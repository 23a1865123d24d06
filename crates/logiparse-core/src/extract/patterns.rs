//! Regex patterns for logistics invoice and waybill fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number: "Invoice No: INV-2024-00892", "invoice # 12/345"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s*(?:no\.?|number|#|num)[:\s#]+([A-Z0-9/\-]+)"
    ).unwrap();

    // Dates: D/M/Y and Y/M/D numeric forms plus "Month D, YYYY"
    pub static ref DATE: Regex = Regex::new(
        r"(?i)(?:date|dated|issued)[:\s]*(\d{1,2}[./\-]\d{1,2}[./\-]\d{2,4}|\d{4}[./\-]\d{1,2}[./\-]\d{1,2}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\w*\s+\d{1,2},?\s+\d{4})"
    ).unwrap();

    // Parties: value runs to end of line or first comma
    pub static ref SENDER: Regex = Regex::new(
        r"(?i)(?:from|sender|shipper|consignor)[:\s]+([^\n,]+)"
    ).unwrap();

    pub static ref RECEIVER: Regex = Regex::new(
        r"(?i)(?:to|receiver|recipient|consignee|billed\s+to|deliver\s+to)[:\s]+([^\n,]+)"
    ).unwrap();

    // Weight with optional unit
    pub static ref TOTAL_WEIGHT: Regex = Regex::new(
        r"(?i)(?:total\s+)?weight[:\s]*([\d,.]+)\s*(kg|lbs?|g|tons?)?"
    ).unwrap();

    // Amount with optional leading currency token
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:grand\s+total|amount\s+due|total\s+amount|total)[:\s]*(PHP|₱|\$|USD|EUR)?\s*([\d,.]+)"
    ).unwrap();

    // Tracking / waybill number
    pub static ref TRACKING_NUMBER: Regex = Regex::new(
        r"(?i)(?:tracking|waybill)\s*(?:no|number|#)[:\s#]*([A-Z0-9\-]+)"
    ).unwrap();

    // Line item row: description, integer quantity, unit price, line total.
    // The description class admits parentheses so rows like
    // "Safety Gloves (box)  10  250.00  2500.00" match.
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"([A-Za-z][A-Za-z0-9()\s\-]{2,30})\s+(\d+)\s+([\d,.]+)\s+([\d,.]+)"
    ).unwrap();
}
