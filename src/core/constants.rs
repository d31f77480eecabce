//! Tuned constants shared across the extraction pipeline.
//!
//! The confidence weights, saturation point, early-exit bound, and quality
//! bands are tuned behavior, not derivable from first principles. They are
//! centralized here so the scorer, the strategy engine, and the quality
//! analyzer never drift apart.

/// A strategy whose composite confidence reaches this bound wins the sweep
/// immediately; later strategies are never tried.
pub const EARLY_EXIT_CONFIDENCE: f64 = 0.9;

/// Weight of the recognizer's averaged per-token confidence in the
/// composite score.
pub const ENGINE_CONFIDENCE_WEIGHT: f64 = 0.7;

/// Weight of the text-length factor in the composite score.
pub const TEXT_LENGTH_WEIGHT: f64 = 0.2;

/// Weight of the character-diversity factor in the composite score.
pub const CHAR_DIVERSITY_WEIGHT: f64 = 0.1;

/// The text-length factor saturates at this many characters.
pub const TEXT_LENGTH_SATURATION: f64 = 10.0;

/// Acceptable mean-brightness band (0-255 scale) for the quality score.
pub const BRIGHTNESS_BAND: (f64, f64) = (50.0, 200.0);

/// Minimum luminance standard deviation considered acceptable contrast.
pub const MIN_CONTRAST: f64 = 30.0;

/// Minimum Laplacian variance considered acceptably sharp.
pub const MIN_SHARPNESS: f64 = 100.0;

/// Acceptable ink-pixel fraction band for the quality score.
pub const TEXT_DENSITY_BAND: (f64, f64) = (0.05, 0.3);

/// Quality score above which a crop is fed straight to the `original`
/// strategy when auto preprocessing is enabled.
pub const QUALITY_FAST_PATH: f64 = 0.7;

/// Quality score above which (and up to [`QUALITY_FAST_PATH`]) contrast
/// enhancement is pre-applied when auto preprocessing is enabled; at or
/// below it the combined pipeline is pre-applied instead.
pub const QUALITY_CONTRAST_GATE: f64 = 0.4;

/// Field counts at or below this threshold are processed sequentially;
/// larger templates use the rayon thread pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;
