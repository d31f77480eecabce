//! Durable per-field extraction results.

use serde::Serialize;

use crate::core::errors::OcrError;
use crate::domain::template::{Field, FieldRect};

/// The durable output produced for one field.
///
/// Every field yields exactly one result, even when extraction failed
/// entirely; the surrounding system persists these as tabular rows or a
/// nested per-image detail structure.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// The field's name, as given in the template.
    pub field_name: String,
    /// The recognized text, trimmed. Empty when nothing was detected.
    pub text: String,
    /// Composite confidence in `[0, 1]`. 0.0 when nothing was detected.
    pub confidence: f64,
    /// Name of the winning preprocessing strategy, or `"none"`.
    pub strategy_used: String,
    /// Wall-clock seconds spent on this field.
    pub processing_time: f64,
    /// The field rectangle this result was extracted from.
    pub coordinates: FieldRect,
    /// `true` iff the trimmed text is non-empty and the confidence meets
    /// the configured threshold.
    pub success: bool,
    /// Description of the failure, when one was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Builds a failed result for a field, recording the error message.
    pub fn failed(field: &Field, error: &OcrError, processing_time: f64) -> Self {
        Self {
            field_name: field.name.clone(),
            text: String::new(),
            confidence: 0.0,
            strategy_used: "none".to_string(),
            processing_time,
            coordinates: field.rect,
            success: false,
            error: Some(error.to_string()),
        }
    }
}
