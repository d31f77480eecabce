//! Field extraction orchestration.
//!
//! For each template field the orchestrator validates the rectangle
//! against the source image, crops it, optionally consults the quality
//! analyzer to pre-select preprocessing, delegates to the strategy
//! engine, and assembles the durable per-field result. Fields never
//! interact; any per-field failure is recorded and the batch continues.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;
use rayon::prelude::*;

use crate::core::config::EngineConfig;
use crate::core::constants::{QUALITY_CONTRAST_GATE, QUALITY_FAST_PATH};
use crate::core::errors::{OcrError, OcrResult};
use crate::domain::results::ExtractionResult;
use crate::domain::template::{Field, Template};
use crate::pipeline::engine::{StrategyEngine, StrategyOutcome};
use crate::pipeline::strategy::Strategy;
use crate::processors::{quality, transforms};
use crate::recognition::TextRecognizer;
use crate::utils::image::crop_field;

/// Extracts structured text from the template-defined regions of a
/// source image.
pub struct FieldExtractor {
    engine: Arc<StrategyEngine>,
    config: EngineConfig,
}

impl FieldExtractor {
    /// Creates an extractor around a recognition backend.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Config` if the configuration is invalid.
    pub fn new(config: EngineConfig, recognizer: Arc<dyn TextRecognizer>) -> OcrResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: Arc::new(StrategyEngine::new(recognizer)),
            config,
        })
    }

    /// The extractor's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extracts every field of the template from the source image.
    ///
    /// Fields are independent: a violated bound, a transform failure, a
    /// recognizer crash, or a timeout in one field is recorded in that
    /// field's result while its siblings proceed. Field counts above the
    /// configured threshold are processed on the rayon thread pool; the
    /// strategy sweep within each field stays strictly sequential.
    ///
    /// # Errors
    ///
    /// Fails as a whole only when no field could possibly succeed: an
    /// empty or out-of-size-range source image, or an invalid template.
    pub fn extract_fields(
        &self,
        image: &DynamicImage,
        template: &Template,
    ) -> OcrResult<BTreeMap<String, ExtractionResult>> {
        self.check_source_image(image)?;
        template.validate()?;

        let start = Instant::now();
        let results: Vec<(String, ExtractionResult)> =
            if template.len() > self.config.parallel_threshold {
                template
                    .fields
                    .par_iter()
                    .map(|field| (field.name.clone(), self.extract_field(image, field)))
                    .collect()
            } else {
                template
                    .fields
                    .iter()
                    .map(|field| (field.name.clone(), self.extract_field(image, field)))
                    .collect()
            };

        let succeeded = results.iter().filter(|(_, r)| r.success).count();
        tracing::info!(
            fields = results.len(),
            succeeded,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "field extraction finished"
        );
        Ok(results.into_iter().collect())
    }

    /// Extracts a single field, yielding exactly one result even on
    /// total failure.
    pub fn extract_field(&self, image: &DynamicImage, field: &Field) -> ExtractionResult {
        let start = Instant::now();

        if let Err(message) = field.rect.check_within(image.width(), image.height()) {
            let err = OcrError::invalid_field_bounds(&field.name, message);
            tracing::warn!(field = %field.name, error = %err, "field skipped");
            return ExtractionResult::failed(field, &err, start.elapsed().as_secs_f64());
        }

        let crop = match crop_field(image, &field.rect) {
            Ok(crop) => crop,
            Err(err) => {
                tracing::warn!(field = %field.name, error = %err, "field skipped");
                return ExtractionResult::failed(field, &err, start.elapsed().as_secs_f64());
            }
        };
        let outcome = match self.config.field_timeout_ms {
            None => Self::sweep(&self.engine, &self.config, &crop),
            Some(timeout_ms) => self.sweep_with_timeout(crop, &field.name, timeout_ms),
        };

        match outcome {
            Ok(outcome) => self.assemble(field, outcome, start.elapsed()),
            Err(err) => {
                tracing::warn!(field = %field.name, error = %err, "field failed");
                ExtractionResult::failed(field, &err, start.elapsed().as_secs_f64())
            }
        }
    }

    fn check_source_image(&self, image: &DynamicImage) -> OcrResult<()> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(OcrError::invalid_image("empty pixel buffer"));
        }
        let (min_w, min_h) = self.config.min_image_size;
        let (max_w, max_h) = self.config.max_image_size;
        if width < min_w || height < min_h {
            return Err(OcrError::invalid_image(format!(
                "image too small: {width}x{height}, minimum {min_w}x{min_h}"
            )));
        }
        if width > max_w || height > max_h {
            return Err(OcrError::invalid_image(format!(
                "image too large: {width}x{height}, maximum {max_w}x{max_h}"
            )));
        }
        Ok(())
    }

    /// Runs one field's sweep, optionally routed through the
    /// quality-gated preprocessing accelerator.
    ///
    /// The exhaustive sweep is the authoritative behavior; the
    /// accelerator only applies when `auto_preprocess` is enabled. A
    /// high-quality crop then runs the `original` strategy alone, a
    /// middling one is contrast-enhanced before the full sweep, and a
    /// poor one goes through the combined pipeline first.
    fn sweep(
        engine: &StrategyEngine,
        config: &EngineConfig,
        crop: &DynamicImage,
    ) -> OcrResult<StrategyOutcome> {
        if !config.auto_preprocess {
            return engine.extract(crop);
        }

        let analysis = quality::analyze(crop)?;
        tracing::debug!(
            quality = analysis.quality_score,
            "auto preprocessing gate"
        );
        if analysis.quality_score > QUALITY_FAST_PATH {
            engine.extract_single(crop, Strategy::Original)
        } else if analysis.quality_score > QUALITY_CONTRAST_GATE {
            let gray = transforms::to_grayscale(crop);
            let enhanced = DynamicImage::ImageLuma8(transforms::enhance_contrast(&gray));
            engine.extract(&enhanced)
        } else {
            let gray = transforms::to_grayscale(crop);
            let preprocessed = DynamicImage::ImageLuma8(transforms::combined(&gray));
            engine.extract(&preprocessed)
        }
    }

    /// Runs the sweep on a helper thread so a hung recognizer surfaces
    /// as a timeout error instead of blocking the batch. The helper is
    /// detached on overrun; it holds only its own copies.
    fn sweep_with_timeout(
        &self,
        crop: DynamicImage,
        field_name: &str,
        timeout_ms: u64,
    ) -> OcrResult<StrategyOutcome> {
        let engine = Arc::clone(&self.engine);
        let config = self.config.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let outcome = Self::sweep(&engine, &config, &crop);
            let _ = tx.send(outcome);
        });

        match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
            Ok(outcome) => outcome,
            Err(_) => Err(OcrError::timeout(field_name, timeout_ms)),
        }
    }

    fn assemble(
        &self,
        field: &Field,
        outcome: StrategyOutcome,
        elapsed: Duration,
    ) -> ExtractionResult {
        let success = !outcome.text.trim().is_empty()
            && outcome.confidence >= self.config.confidence_threshold;
        ExtractionResult {
            field_name: field.name.clone(),
            text: outcome.text,
            confidence: outcome.confidence,
            strategy_used: outcome.strategy_used,
            processing_time: elapsed.as_secs_f64(),
            coordinates: field.rect,
            success,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::FieldRect;
    use crate::recognition::RecognizedToken;

    /// Returns the same token list on every call.
    struct EchoRecognizer {
        tokens: Vec<RecognizedToken>,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl EchoRecognizer {
        fn new(tokens: Vec<RecognizedToken>) -> Self {
            Self {
                tokens,
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::new(vec![])
        }

        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl TextRecognizer for EchoRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> OcrResult<Vec<RecognizedToken>> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.tokens.clone())
        }
    }

    /// Sleeps on every call; used to trigger the per-field timeout.
    struct SleepyRecognizer {
        delay: Duration,
    }

    impl TextRecognizer for SleepyRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> OcrResult<Vec<RecognizedToken>> {
            std::thread::sleep(self.delay);
            Ok(vec![])
        }
    }

    fn field(name: &str, x: u32, y: u32, w: u32, h: u32) -> Field {
        Field {
            name: name.to_string(),
            rect: FieldRect { x, y, w, h },
        }
    }

    fn source_image() -> DynamicImage {
        DynamicImage::new_rgb8(200, 100)
    }

    fn extractor_with(recognizer: impl TextRecognizer + 'static) -> FieldExtractor {
        FieldExtractor::new(EngineConfig::default(), Arc::new(recognizer)).unwrap()
    }

    /// Ten distinct characters at full confidence scores 1.0.
    fn strong_tokens() -> Vec<RecognizedToken> {
        vec![RecognizedToken::new("abcdefghij", 100.0)]
    }

    #[test]
    fn test_out_of_bounds_field_fails_without_aborting_siblings() {
        let extractor = FieldExtractor::new(
            EngineConfig {
                min_image_size: (25, 10),
                ..EngineConfig::default()
            },
            Arc::new(EchoRecognizer::new(strong_tokens())),
        )
        .unwrap();
        let image = DynamicImage::new_rgb8(25, 40);
        let template = Template::new(vec![
            field("bad", 10, 0, 20, 10),
            field("good", 0, 0, 10, 10),
        ]);

        let results = extractor.extract_fields(&image, &template).unwrap();
        assert_eq!(results.len(), 2);

        let bad = &results["bad"];
        assert!(!bad.success);
        assert_eq!(bad.confidence, 0.0);
        assert_eq!(bad.text, "");
        assert!(bad.error.as_deref().unwrap().contains("invalid field bounds"));
        assert!(bad.error.as_deref().unwrap().contains("x + w = 30"));

        let good = &results["good"];
        assert!(good.success);
        assert_eq!(good.text, "abcdefghij");
    }

    #[test]
    fn test_textless_image_yields_none_result_without_error() {
        let extractor = extractor_with(EchoRecognizer::empty());
        let template = Template::new(vec![field("total", 10, 10, 50, 20)]);

        let results = extractor.extract_fields(&source_image(), &template).unwrap();
        let result = &results["total"];
        assert_eq!(result.text, "");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.strategy_used, "none");
        assert!(!result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_success_requires_confidence_threshold() {
        // "ab" at engine confidence 30 scores 0.7*0.3 + 0.2*0.2 + 0.1*1.0
        // = 0.35, below the 0.6 threshold.
        let extractor = extractor_with(EchoRecognizer::new(vec![RecognizedToken::new("ab", 30.0)]));
        let template = Template::new(vec![field("total", 0, 0, 50, 20)]);

        let results = extractor.extract_fields(&source_image(), &template).unwrap();
        let result = &results["total"];
        assert_eq!(result.text, "ab");
        assert!(!result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let template = Template::new(vec![
            field("a", 0, 0, 50, 20),
            field("b", 60, 0, 50, 20),
        ]);
        let extractor = extractor_with(EchoRecognizer::new(strong_tokens()));

        let first = extractor.extract_fields(&source_image(), &template).unwrap();
        let second = extractor.extract_fields(&source_image(), &template).unwrap();
        for name in ["a", "b"] {
            assert_eq!(first[name].text, second[name].text);
            assert_eq!(first[name].confidence, second[name].confidence);
            assert_eq!(first[name].strategy_used, second[name].strategy_used);
        }
    }

    #[test]
    fn test_full_bleed_field_crops_cleanly() {
        // x + w and y + h land exactly on the image edges.
        let extractor = extractor_with(EchoRecognizer::new(strong_tokens()));
        let template = Template::new(vec![field("whole", 0, 0, 200, 100)]);

        let results = extractor.extract_fields(&source_image(), &template).unwrap();
        assert!(results["whole"].success);
        assert_eq!(results["whole"].text, "abcdefghij");
        assert_eq!(
            results["whole"].coordinates,
            FieldRect { x: 0, y: 0, w: 200, h: 100 }
        );
    }

    #[test]
    fn test_source_image_size_limits() {
        let extractor = extractor_with(EchoRecognizer::empty());
        let tiny = DynamicImage::new_rgb8(10, 10);
        let template = Template::new(vec![field("a", 0, 0, 5, 5)]);
        assert!(matches!(
            extractor.extract_fields(&tiny, &template),
            Err(OcrError::InvalidImage { .. })
        ));

        let empty = DynamicImage::new_rgb8(0, 0);
        assert!(extractor.extract_fields(&empty, &template).is_err());
    }

    #[test]
    fn test_field_timeout_recorded_and_batch_continues() {
        let config = EngineConfig {
            field_timeout_ms: Some(20),
            ..EngineConfig::default()
        };
        let extractor = FieldExtractor::new(
            config,
            Arc::new(SleepyRecognizer {
                delay: Duration::from_millis(200),
            }),
        )
        .unwrap();
        let template = Template::new(vec![field("slow", 0, 0, 50, 20)]);

        let results = extractor.extract_fields(&source_image(), &template).unwrap();
        let result = &results["slow"];
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("timed out"));
    }

    #[test]
    fn test_quality_fast_path_runs_original_only() {
        // A crop that satisfies all four quality bands gates straight to
        // the single `original` strategy.
        let gray = image::GrayImage::from_fn(100, 100, |x, y| {
            if x % 10 < 3 && y % 10 < 5 {
                image::Luma([0u8])
            } else {
                image::Luma([160u8])
            }
        });
        let image = DynamicImage::ImageLuma8(gray);

        let recognizer = Arc::new(EchoRecognizer::new(strong_tokens()));
        let config = EngineConfig {
            auto_preprocess: true,
            ..EngineConfig::default()
        };
        let extractor =
            FieldExtractor::new(config, recognizer.clone() as Arc<dyn TextRecognizer>).unwrap();
        let template = Template::new(vec![field("whole", 0, 0, 100, 100)]);

        let results = extractor.extract_fields(&image, &template).unwrap();
        assert_eq!(results["whole"].strategy_used, "original");
        assert_eq!(recognizer.calls(), 1);
    }

    #[test]
    fn test_parallel_fields_all_produce_results() {
        let config = EngineConfig {
            parallel_threshold: 0,
            ..EngineConfig::default()
        };
        let extractor =
            FieldExtractor::new(config, Arc::new(EchoRecognizer::new(strong_tokens()))).unwrap();
        let template = Template::new(vec![
            field("a", 0, 0, 40, 20),
            field("b", 50, 0, 40, 20),
            field("c", 100, 0, 40, 20),
        ]);

        let results = extractor.extract_fields(&source_image(), &template).unwrap();
        assert_eq!(results.len(), 3);
        for name in ["a", "b", "c"] {
            assert_eq!(results[name].text, "abcdefghij");
            assert!(results[name].success);
        }
    }

    #[test]
    fn test_duplicate_template_rejected_up_front() {
        let extractor = extractor_with(EchoRecognizer::empty());
        let template = Template::new(vec![
            field("a", 0, 0, 10, 10),
            field("a", 20, 0, 10, 10),
        ]);
        assert!(matches!(
            extractor.extract_fields(&source_image(), &template),
            Err(OcrError::Config { .. })
        ));
    }
}
