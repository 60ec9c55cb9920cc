//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod analytics;
mod inference;
mod prediction;

pub use analytics::{AnalyticsService, BoxSummary, HistoryStatistics};
pub use inference::{ArtifactInference, InferenceAdapter};
pub use prediction::{ArtifactPredictionService, PredictionService};
