//! # Obescan
//!
//! Obesity level estimation from lifestyle and anthropometric attributes.
//!
//! This crate provides:
//! - Field normalization from form values to the model's feature encoding
//! - Inference over externally fitted scaler, classifier and label encoder
//! - Category advice lookup and per-session history statistics
//! - Terminal UI for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (fields, feature schema, normalizer, predictions, sessions)
//! - `ports`: Trait definitions for the fitted artifacts and session storage
//! - `adapters`: Concrete implementations (JSON artifacts, in-memory store, log redaction)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{LifestyleForm, ObesityCategory, Prediction, PredictionResult};

/// Result type for Obescan operations
pub type Result<T> = std::result::Result<T, ObescanError>;

/// Main error type for Obescan
#[derive(Debug, thiserror::Error)]
pub enum ObescanError {
    /// An artifact could not be read, verified or parsed. Fatal at startup.
    #[error("Failed to load model artifacts: {0}")]
    ArtifactLoad(adapters::ArtifactError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The form, the normalizer and the artifacts disagree on columns.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Session error: {0}")]
    Session(#[from] adapters::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ObescanError {
    /// Whether the process cannot serve predictions after this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ArtifactLoad(_) | Self::Io(_))
    }
}

impl From<adapters::ArtifactError> for ObescanError {
    fn from(err: adapters::ArtifactError) -> Self {
        match err {
            adapters::ArtifactError::Inconsistent(msg) => Self::SchemaMismatch(msg),
            other => Self::ArtifactLoad(other),
        }
    }
}

impl From<domain::NormalizeError> for ObescanError {
    fn from(err: domain::NormalizeError) -> Self {
        match err {
            domain::NormalizeError::InvalidInput { .. } => Self::InvalidInput(err.to_string()),
            domain::NormalizeError::SchemaMismatch(msg) => Self::SchemaMismatch(msg),
        }
    }
}

impl From<ports::ModelError> for ObescanError {
    fn from(err: ports::ModelError) -> Self {
        match err {
            ports::ModelError::Malformed(reason) => {
                Self::ArtifactLoad(adapters::ArtifactError::Malformed {
                    file: "loaded artifacts".to_string(),
                    reason,
                })
            }
            // Any other rejection means the vector and artifacts disagree.
            other => Self::SchemaMismatch(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let e: ObescanError = domain::NormalizeError::SchemaMismatch("x".into()).into();
        assert!(matches!(e, ObescanError::SchemaMismatch(_)));

        let e: ObescanError = adapters::ArtifactError::Inconsistent("widths".into()).into();
        assert!(matches!(e, ObescanError::SchemaMismatch(_)));
        assert!(!e.is_fatal());

        let e: ObescanError = adapters::ArtifactError::DigestMismatch("model.json".into()).into();
        assert!(e.is_fatal());

        let e: ObescanError = ports::ModelError::ShapeMismatch { expected: 11, got: 12 }.into();
        assert!(matches!(e, ObescanError::SchemaMismatch(_)));

        let e: ObescanError = ports::ModelError::Malformed("tree node 0 cannot be followed".into()).into();
        assert!(matches!(e, ObescanError::ArtifactLoad(_)));
        assert!(e.is_fatal());
    }
}
