//! Domain value types: templates, fields, and extraction results.

pub mod results;
pub mod template;

pub use results::ExtractionResult;
pub use template::{Field, FieldRect, Template};
