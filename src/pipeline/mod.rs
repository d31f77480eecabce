//! The extraction pipeline: strategies, scoring, the strategy engine,
//! and the field orchestrator.

pub mod engine;
pub mod extractor;
pub mod scorer;
pub mod strategy;

pub use engine::{StrategyEngine, StrategyOutcome};
pub use extractor::FieldExtractor;
pub use strategy::Strategy;
