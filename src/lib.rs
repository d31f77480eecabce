//! # roi-ocr
//!
//! Extracts structured text from template-defined regions of document
//! images. For every named rectangle ("field") in a template, a fixed
//! battery of image-preprocessing strategies is applied to the cropped
//! region, each transformed variant is recognized, the attempts are
//! scored by a composite confidence metric, and the best result wins —
//! with an early exit as soon as one strategy is confident enough.
//!
//! ## Components
//!
//! - **Strategy engine**: the ordered nine-strategy sweep with
//!   best-tracking and early exit.
//! - **Confidence scorer**: blends engine-reported token confidence with
//!   text-length and character-diversity signals into one bounded score.
//! - **Quality analyzer**: brightness/contrast/sharpness/ink-density
//!   bands producing a 0-1 quality score and improvement hints.
//! - **Field orchestrator**: validates field bounds, crops, sweeps, and
//!   assembles one honest result per field, containing every failure at
//!   the smallest possible scope.
//!
//! ## Modules
//!
//! * [`core`] - Error taxonomy, configuration, tuned constants
//! * [`domain`] - Templates, fields, extraction results
//! * [`processors`] - Pixel transforms and quality analysis
//! * [`recognition`] - The `TextRecognizer` trait and Tesseract adapter
//! * [`pipeline`] - Strategy engine, scorer, and field orchestrator
//! * [`utils`] - Image loading helpers
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roi_ocr::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::default();
//! let recognizer = Arc::new(TesseractRecognizer::new(&config)?);
//! let extractor = FieldExtractor::new(config, recognizer)?;
//!
//! let template = Template::from_json(r#"{
//!     "fields": [
//!         {"name": "invoice_no", "x": 40, "y": 32, "w": 220, "h": 36},
//!         {"name": "total",      "x": 40, "y": 96, "w": 140, "h": 36}
//!     ]
//! }"#)?;
//!
//! let image = load_image(std::path::Path::new("invoice.png"))?;
//! let results = extractor.extract_fields(&image, &template)?;
//! for (name, result) in &results {
//!     println!("{name}: '{}' ({:.3} via {})", result.text, result.confidence, result.strategy_used);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod recognition;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Brings the common surface into scope with a single use statement:
///
/// ```rust
/// use roi_ocr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{EngineConfig, OcrError, OcrResult};
    pub use crate::domain::{ExtractionResult, Field, FieldRect, Template};
    pub use crate::pipeline::{FieldExtractor, Strategy, StrategyEngine, StrategyOutcome};
    pub use crate::processors::{analyze, QualityAnalysis};
    pub use crate::recognition::{RecognizedToken, TesseractRecognizer, TextRecognizer};
    pub use crate::utils::load_image;
}
