//! Tesseract recognition backend via `rusty-tesseract`.

use std::collections::HashMap;

use image::DynamicImage;
use rusty_tesseract::{Args, Image};

use crate::core::config::EngineConfig;
use crate::core::errors::{OcrError, OcrResult};
use crate::recognition::{RecognizedToken, TextRecognizer};

/// Page segmentation mode 6: assume a single uniform block of text.
/// Template fields are tight crops around one value, not full pages.
const FIELD_PSM: i32 = 6;

/// Default OCR engine mode (LSTM + legacy as available).
const DEFAULT_OEM: i32 = 3;

/// A [`TextRecognizer`] backed by the system Tesseract installation.
///
/// Uses `image_to_data` so every word arrives with its own confidence,
/// which the scorer needs. Words with empty text are dropped here; the
/// confidence filtering (<= 0 means non-detection) stays in the scorer so
/// the rule lives in one place.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    lang: String,
}

impl TesseractRecognizer {
    /// Creates a recognizer for the configured languages.
    ///
    /// Probes the system installation up front: without the probe a
    /// missing engine would be downgraded to skipped attempts inside the
    /// strategy loop and every field of every image would quietly come
    /// back empty.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Recognition` when the Tesseract binary cannot
    /// be found or executed.
    pub fn new(config: &EngineConfig) -> OcrResult<Self> {
        rusty_tesseract::get_tesseract_version().map_err(OcrError::recognition)?;
        Ok(Self {
            lang: config.language_spec(),
        })
    }

    /// The language specification passed to Tesseract (e.g. `eng+ind`).
    pub fn language_spec(&self) -> &str {
        &self.lang
    }

    fn args(&self) -> Args {
        Args {
            lang: self.lang.clone(),
            config_variables: HashMap::new(),
            dpi: None,
            psm: Some(FIELD_PSM),
            oem: Some(DEFAULT_OEM),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> OcrResult<Vec<RecognizedToken>> {
        let tess_image = Image::from_dynamic_image(image).map_err(OcrError::recognition)?;
        let output = rusty_tesseract::image_to_data(&tess_image, &self.args())
            .map_err(OcrError::recognition)?;

        let tokens = output
            .data
            .into_iter()
            .filter(|record| !record.text.trim().is_empty())
            .map(|record| RecognizedToken::new(record.text, record.conf))
            .collect();
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_spec_joins_configured_languages() {
        let recognizer = TesseractRecognizer {
            lang: EngineConfig::default().language_spec(),
        };
        assert_eq!(recognizer.language_spec(), "eng+ind");

        let config = EngineConfig {
            languages: vec!["deu".to_string()],
            ..EngineConfig::default()
        };
        let recognizer = TesseractRecognizer {
            lang: config.language_spec(),
        };
        assert_eq!(recognizer.language_spec(), "deu");
    }

    #[test]
    fn test_construction_probes_engine_availability() {
        // With a working installation construction succeeds; without one
        // it must fail loudly as a recognition error rather than letting
        // every field quietly come back empty.
        match TesseractRecognizer::new(&EngineConfig::default()) {
            Ok(recognizer) => assert_eq!(recognizer.language_spec(), "eng+ind"),
            Err(err) => assert!(matches!(err, OcrError::Recognition { .. })),
        }
    }
}
