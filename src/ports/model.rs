//! Model port: traits for the externally fitted inference artifacts.
//!
//! The scaler, classifier and label encoder are fitted outside this crate.
//! Implementations are loaded once and never mutated afterwards, so they
//! can be shared read-only between request handlers.

use crate::domain::FeatureVector;

/// Errors raised by the artifact capabilities at inference time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("column {position} is '{got}', scaler was fit with '{expected}'")]
    ColumnOrder {
        position: usize,
        expected: String,
        got: String,
    },

    #[error("feature {0} is not a finite number")]
    NonFinite(usize),

    #[error("class index {0} has no label")]
    UnknownClass(usize),

    /// Artifact parameters that were never validated do not line up.
    #[error("artifact parameters are inconsistent: {0}")]
    Malformed(String),
}

/// Fitted feature scaler (`transform`).
pub trait FeatureScaler: Send + Sync {
    /// Training column order.
    fn feature_names(&self) -> &[String];

    /// Number of input columns.
    fn n_features(&self) -> usize {
        self.feature_names().len()
    }

    /// Apply the fitted per-feature transform.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` or `ColumnOrder` if `features` does not carry
    /// exactly the fitted columns in the fitted order.
    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;
}

/// Fitted classifier (`predict`).
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;

    /// Predict a single class index for one scaled row.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the row width is wrong.
    fn predict(&self, scaled: &[f64]) -> Result<usize, ModelError>;
}

/// Fitted label encoder (`inverse_transform`).
pub trait LabelDecoder: Send + Sync {
    fn classes(&self) -> &[String];

    /// Map a class index back to its label.
    ///
    /// # Errors
    /// Returns `UnknownClass` if the index is out of range.
    fn inverse_transform(&self, index: usize) -> Result<&str, ModelError>;
}
