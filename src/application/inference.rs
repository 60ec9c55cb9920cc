//! Inference adapter: scale → predict → decode → format.
//!
//! Wraps the three fitted artifacts behind their ports. The artifacts are
//! shared read-only; `infer` takes `&self` and never mutates them, so one
//! adapter can serve any number of sessions.

use std::sync::Arc;

use crate::adapters::artifacts::{ArtifactBundle, ClassifierArtifact, LabelEncoder, ScalerArtifact};
use crate::domain::{FeatureSchema, FeatureVector, ObesityCategory, PredictionResult};
use crate::ports::{Classifier, FeatureScaler, LabelDecoder};
use crate::{ObescanError, Result};

/// Runs one feature vector through the fitted scaler, classifier and encoder.
pub struct InferenceAdapter<S, C, L>
where
    S: FeatureScaler,
    C: Classifier,
    L: LabelDecoder,
{
    scaler: Arc<S>,
    classifier: Arc<C>,
    encoder: Arc<L>,
    schema: FeatureSchema,
}

/// Adapter over the JSON artifact implementations.
pub type ArtifactInference = InferenceAdapter<ScalerArtifact, ClassifierArtifact, LabelEncoder>;

impl ArtifactInference {
    /// Build from a loaded artifact bundle.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the bundle's column names are unknown.
    pub fn from_bundle(bundle: &ArtifactBundle) -> Result<Self> {
        Self::new(
            Arc::clone(&bundle.scaler),
            Arc::clone(&bundle.classifier),
            Arc::clone(&bundle.encoder),
        )
    }
}

impl<S, C, L> InferenceAdapter<S, C, L>
where
    S: FeatureScaler,
    C: Classifier,
    L: LabelDecoder,
{
    /// Wire the artifacts together, checking that they agree.
    ///
    /// The scaler's column names become the schema every input must match.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the column names are unknown, the widths
    /// or class counts disagree, or an encoder label is outside the
    /// category set.
    pub fn new(scaler: Arc<S>, classifier: Arc<C>, encoder: Arc<L>) -> Result<Self> {
        let schema = FeatureSchema::from_column_names(scaler.feature_names())?;

        if classifier.n_features() != schema.len() {
            return Err(ObescanError::SchemaMismatch(format!(
                "scaler has {} columns, classifier expects {}",
                schema.len(),
                classifier.n_features()
            )));
        }
        if encoder.classes().len() != classifier.n_classes() {
            return Err(ObescanError::SchemaMismatch(format!(
                "encoder has {} classes, classifier predicts {}",
                encoder.classes().len(),
                classifier.n_classes()
            )));
        }
        if let Some(unknown) = encoder
            .classes()
            .iter()
            .find(|c| ObesityCategory::from_label(c).is_none())
        {
            return Err(ObescanError::SchemaMismatch(format!(
                "encoder label '{unknown}' is not an obesity category"
            )));
        }

        tracing::debug!("Inference schema: {:?}", schema.column_names());

        Ok(Self {
            scaler,
            classifier,
            encoder,
            schema,
        })
    }

    /// Column order the artifacts were fit on.
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Predict the category for one encoded submission.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the vector's columns are not the fitted
    /// columns in the fitted order, or the artifacts reject it.
    pub fn infer(&self, features: &FeatureVector) -> Result<PredictionResult> {
        if features.columns() != self.schema.columns() {
            return Err(ObescanError::SchemaMismatch(format!(
                "vector columns {:?} do not match fitted columns {:?}",
                features
                    .columns()
                    .iter()
                    .map(|c| c.column_name())
                    .collect::<Vec<_>>(),
                self.schema.column_names()
            )));
        }

        tracing::debug!("Step 1: scaling {} features", features.len());
        let scaled = self.scaler.transform(features)?;

        tracing::debug!("Step 2: predicting class index");
        let index = self.classifier.predict(&scaled)?;

        tracing::debug!("Step 3: decoding class {}", index);
        let raw = self.encoder.inverse_transform(index)?;

        PredictionResult::from_decoded(index, raw).ok_or_else(|| {
            ObescanError::SchemaMismatch(format!("encoder label '{raw}' is not an obesity category"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldNormalizer, FieldSet, LifestyleForm};
    use crate::ports::ModelError;
    use std::path::Path;

    fn fixture() -> ArtifactInference {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let bundle = ArtifactBundle::load(&dir, true).unwrap();
        ArtifactInference::from_bundle(&bundle).unwrap()
    }

    fn encode(adapter: &ArtifactInference, form: &LifestyleForm) -> FeatureVector {
        FieldNormalizer::new(adapter.schema().clone())
            .normalize(form)
            .unwrap()
    }

    #[test]
    fn test_fixture_schema_is_compact() {
        assert_eq!(fixture().schema().field_set(), Some(FieldSet::Compact));
    }

    #[test]
    fn test_fixture_predictions() {
        let adapter = fixture();
        let mut form = LifestyleForm::sample();

        let result = adapter.infer(&encode(&adapter, &form)).unwrap();
        assert_eq!(result.category, ObesityCategory::NormalWeight);
        assert_eq!(result.raw_label, "Normal_Weight");
        assert_eq!(result.label, "Normal Weight");

        form.weight = 150.0;
        let result = adapter.infer(&encode(&adapter, &form)).unwrap();
        assert_eq!(result.category, ObesityCategory::ObesityTypeIII);

        form.weight = 40.0;
        let result = adapter.infer(&encode(&adapter, &form)).unwrap();
        assert_eq!(result.category, ObesityCategory::InsufficientWeight);
    }

    #[test]
    fn test_inference_is_deterministic_and_pure() {
        let adapter = fixture();
        let before = serde_json::to_string(adapter.scaler.as_ref()).unwrap();
        let v = encode(&adapter, &LifestyleForm::sample());

        let first = adapter.infer(&v).unwrap();
        let second = adapter.infer(&v).unwrap();
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(adapter.scaler.as_ref()).unwrap(), before);
    }

    #[test]
    fn test_rejects_wrong_columns() {
        let adapter = fixture();
        let wrong = FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Anthropometric))
            .normalize(&LifestyleForm::sample())
            .unwrap();
        assert!(matches!(
            adapter.infer(&wrong),
            Err(ObescanError::SchemaMismatch(_))
        ));
    }

    struct FixedScaler(Vec<String>);

    impl FeatureScaler for FixedScaler {
        fn feature_names(&self) -> &[String] {
            &self.0
        }

        fn transform(&self, features: &FeatureVector) -> std::result::Result<Vec<f64>, ModelError> {
            Ok(features.values().to_vec())
        }
    }

    struct ConstantClassifier {
        width: usize,
        classes: usize,
        answer: usize,
    }

    impl Classifier for ConstantClassifier {
        fn n_features(&self) -> usize {
            self.width
        }

        fn n_classes(&self) -> usize {
            self.classes
        }

        fn predict(&self, _scaled: &[f64]) -> std::result::Result<usize, ModelError> {
            Ok(self.answer)
        }
    }

    fn adapter_with(
        classes: &[&str],
        width: usize,
        answer: usize,
    ) -> Result<InferenceAdapter<FixedScaler, ConstantClassifier, LabelEncoder>> {
        InferenceAdapter::new(
            Arc::new(FixedScaler(vec!["Age".into(), "Weight".into()])),
            Arc::new(ConstantClassifier {
                width,
                classes: classes.len(),
                answer,
            }),
            Arc::new(LabelEncoder::new(classes.iter().map(|s| s.to_string()).collect())),
        )
    }

    #[test]
    fn test_decodes_and_formats_label() {
        let adapter = adapter_with(&["Normal_Weight", "Overweight_Level_II"], 2, 1).unwrap();
        let v = FieldNormalizer::new(adapter.schema().clone())
            .normalize(&LifestyleForm::sample())
            .unwrap();
        let result = adapter.infer(&v).unwrap();
        assert_eq!(result.class_index, 1);
        assert_eq!(result.label, "Overweight Level II");
    }

    #[test]
    fn test_construction_checks() {
        assert!(matches!(
            adapter_with(&["Normal_Weight", "Obesity_Type_I"], 3, 0),
            Err(ObescanError::SchemaMismatch(_))
        ));
        assert!(matches!(
            adapter_with(&["Normal_Weight", "Mystery"], 2, 0),
            Err(ObescanError::SchemaMismatch(_))
        ));
    }
}
