//! Field extraction strategies.

mod model;
mod pattern;
pub mod patterns;

pub use model::ModelExtractor;
pub use pattern::PatternExtractor;

use crate::document::DocumentContent;
use crate::models::record::ExtractedRecord;

/// One way of turning a document into an [`ExtractedRecord`].
///
/// Extraction never fails past this boundary: strategies degrade to an
/// all-null record with a descriptive preview instead of returning errors,
/// so the pipeline can always produce a validation report.
pub trait ExtractionStrategy {
    /// Extract fields from the document.
    fn extract(&self, content: &DocumentContent) -> ExtractedRecord;

    /// Short strategy name for logs and output.
    fn name(&self) -> &'static str;
}
