//! Fitted feature scalers exported as JSON.

use serde::{Deserialize, Serialize};

use crate::domain::{Feature, FeatureVector};
use crate::ports::{FeatureScaler, ModelError};

/// Exported scaler parameters.
///
/// `standard` mirrors a standardization scaler (`mean_`, `scale_`);
/// `min_max` mirrors a min-max scaler fit to `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard {
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        feature_names: Vec<String>,
        data_min: Vec<f64>,
        data_range: Vec<f64>,
    },
}

impl ScalerArtifact {
    /// Check parameter lengths and values.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        let (names, offset, divisor) = self.parameters();
        if names.is_empty() {
            return Err("feature_names is empty".into());
        }
        if offset.len() != names.len() || divisor.len() != names.len() {
            return Err(format!(
                "parameter lengths ({}, {}) do not match {} feature names",
                offset.len(),
                divisor.len(),
                names.len()
            ));
        }
        if let Some(i) = offset
            .iter()
            .chain(divisor.iter())
            .position(|v| !v.is_finite())
        {
            return Err(format!("non-finite parameter at position {i}"));
        }
        Ok(())
    }

    fn parameters(&self) -> (&[String], &[f64], &[f64]) {
        match self {
            Self::Standard {
                feature_names,
                mean,
                scale,
            } => (feature_names, mean, scale),
            Self::MinMax {
                feature_names,
                data_min,
                data_range,
            } => (feature_names, data_min, data_range),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "standard",
            Self::MinMax { .. } => "min_max",
        }
    }
}

impl FeatureScaler for ScalerArtifact {
    fn feature_names(&self) -> &[String] {
        self.parameters().0
    }

    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let (names, offset, divisor) = self.parameters();

        if features.len() != names.len() {
            return Err(ModelError::ShapeMismatch {
                expected: names.len(),
                got: features.len(),
            });
        }

        for (position, (name, column)) in names.iter().zip(features.columns()).enumerate() {
            if Feature::from_column_name(name) != Some(*column) {
                return Err(ModelError::ColumnOrder {
                    position,
                    expected: name.clone(),
                    got: column.column_name().to_string(),
                });
            }
        }

        features
            .values()
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                if !x.is_finite() {
                    return Err(ModelError::NonFinite(i));
                }
                let (Some(&o), Some(&d)) = (offset.get(i), divisor.get(i)) else {
                    return Err(ModelError::Malformed(format!("no scaling parameters for column {i}")));
                };
                // Constant features were fit with a zero spread; the fitting
                // library substitutes 1.0 there.
                let d = if d == 0.0 { 1.0 } else { d };
                Ok((x - o) / d)
            })
            .collect()
    }
}
