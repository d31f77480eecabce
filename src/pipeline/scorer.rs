//! Composite confidence scoring.
//!
//! A deterministic formula blending the recognizer's own per-token
//! confidence with text-length and character-diversity signals. The
//! 0.7/0.2/0.1 weights and the 10-character saturation point are tuned
//! behavior and must not change; they live in [`crate::core::constants`].

use crate::core::constants::{
    CHAR_DIVERSITY_WEIGHT, ENGINE_CONFIDENCE_WEIGHT, TEXT_LENGTH_SATURATION, TEXT_LENGTH_WEIGHT,
};
use crate::recognition::RecognizedToken;

/// Keeps only tokens that represent real detections: positive engine
/// confidence and non-blank text.
pub fn surviving(tokens: &[RecognizedToken]) -> Vec<&RecognizedToken> {
    tokens
        .iter()
        .filter(|t| t.confidence > 0.0 && !t.text.trim().is_empty())
        .collect()
}

/// Joins the surviving tokens' trimmed texts with single spaces.
pub fn joined_text(tokens: &[RecognizedToken]) -> String {
    surviving(tokens)
        .iter()
        .map(|t| t.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Computes the composite confidence for one recognition attempt.
///
/// * average engine confidence, normalized from 0-100 to 0-1 (weight 0.7)
/// * text-length factor `min(len / 10, 1)` over the joined text (weight 0.2)
/// * distinct lowercased characters divided by total characters (weight 0.1)
///
/// Character counts are Unicode scalar counts over the space-joined text.
/// Returns exactly 0.0 when no token survives filtering; otherwise the
/// weighted sum clamped to `[0, 1]`.
pub fn score(tokens: &[RecognizedToken]) -> f64 {
    let surviving = surviving(tokens);
    if surviving.is_empty() {
        return 0.0;
    }

    let avg_engine_confidence = surviving
        .iter()
        .map(|t| f64::from(t.confidence) / 100.0)
        .sum::<f64>()
        / surviving.len() as f64;

    let text = joined_text(tokens);
    let total_chars = text.chars().count();
    if total_chars == 0 {
        return 0.0;
    }

    let text_length_factor = (total_chars as f64 / TEXT_LENGTH_SATURATION).min(1.0);

    let distinct: std::collections::BTreeSet<char> = text.to_lowercase().chars().collect();
    let unique_chars_factor = distinct.len() as f64 / total_chars as f64;

    let composite = ENGINE_CONFIDENCE_WEIGHT * avg_engine_confidence
        + TEXT_LENGTH_WEIGHT * text_length_factor
        + CHAR_DIVERSITY_WEIGHT * unique_chars_factor;
    composite.clamp(0.0, 1.0)
}
