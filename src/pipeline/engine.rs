//! The adaptive multi-strategy extraction engine.
//!
//! Applies the fixed battery of preprocessing strategies to a cropped
//! region in order, recognizes each transformed variant, scores every
//! attempt with the composite confidence formula, and keeps the best
//! non-empty result. A sufficiently confident attempt ends the sweep
//! early; the first comparably excellent strategy wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;

use crate::core::constants::EARLY_EXIT_CONFIDENCE;
use crate::core::errors::{OcrError, OcrResult};
use crate::pipeline::scorer;
use crate::pipeline::strategy::Strategy;
use crate::recognition::TextRecognizer;

/// The engine's best answer for one cropped region.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    /// The best recognized text, trimmed. Empty when nothing was found.
    pub text: String,
    /// Composite confidence of the winning attempt, in `[0, 1]`.
    pub confidence: f64,
    /// Name of the winning strategy, or `"none"` when every strategy
    /// came back empty.
    pub strategy_used: String,
    /// Wall-clock time for the entire sweep, not per strategy.
    pub elapsed: Duration,
}

impl StrategyOutcome {
    /// The "no text detected" outcome. A normal terminal state, never an
    /// error.
    fn none(elapsed: Duration) -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            strategy_used: "none".to_string(),
            elapsed,
        }
    }
}

/// Orchestrates the ordered strategy sweep over one image region.
pub struct StrategyEngine {
    recognizer: Arc<dyn TextRecognizer>,
}

impl StrategyEngine {
    /// Creates an engine around a recognition backend.
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Runs the full ordered sweep over all nine strategies.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::InvalidImage` for an empty crop. Per-strategy
    /// transform and recognition failures never surface here; they are
    /// logged and the sweep continues.
    pub fn extract(&self, image: &DynamicImage) -> OcrResult<StrategyOutcome> {
        self.run(image, &Strategy::ALL)
    }

    /// Runs a single strategy only. Used by the quality-gated fast path.
    pub fn extract_single(
        &self,
        image: &DynamicImage,
        strategy: Strategy,
    ) -> OcrResult<StrategyOutcome> {
        self.run(image, &[strategy])
    }

    fn run(&self, image: &DynamicImage, strategies: &[Strategy]) -> OcrResult<StrategyOutcome> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::invalid_image("empty crop"));
        }

        let start = Instant::now();
        let mut best: Option<StrategyOutcome> = None;
        let mut best_confidence = 0.0f64;

        for strategy in strategies {
            let transformed = match strategy.apply(image) {
                Ok(transformed) => transformed,
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "transform failed, skipping");
                    continue;
                }
            };

            let tokens = match self.recognizer.recognize(&transformed) {
                Ok(tokens) => tokens,
                Err(e) => {
                    // Treated like an empty attempt; the sweep continues.
                    tracing::debug!(strategy = strategy.name(), error = %e, "recognition failed");
                    continue;
                }
            };

            let text = scorer::joined_text(&tokens);
            let confidence = scorer::score(&tokens);
            tracing::debug!(
                strategy = strategy.name(),
                confidence,
                chars = text.chars().count(),
                "strategy attempt scored"
            );

            if confidence > best_confidence && !text.trim().is_empty() {
                best_confidence = confidence;
                best = Some(StrategyOutcome {
                    text: text.trim().to_string(),
                    confidence,
                    strategy_used: strategy.name().to_string(),
                    elapsed: Duration::ZERO,
                });

                if confidence >= EARLY_EXIT_CONFIDENCE {
                    tracing::debug!(strategy = strategy.name(), confidence, "early exit");
                    break;
                }
            }
        }

        let elapsed = start.elapsed();
        Ok(match best {
            Some(mut outcome) => {
                outcome.elapsed = elapsed;
                outcome
            }
            None => StrategyOutcome::none(elapsed),
        })
    }
}
