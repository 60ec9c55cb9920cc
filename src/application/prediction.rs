//! Prediction service: one form submission through the whole pipeline.
//!
//! normalize → infer → recommend → record in the caller's session.

use crate::adapters::artifacts::{ArtifactBundle, ClassifierArtifact, LabelEncoder, ScalerArtifact};
use crate::adapters::StoreError;
use crate::domain::{FieldNormalizer, LifestyleForm, Prediction, RecommendationTable, Session};
use crate::ports::{Classifier, FeatureScaler, LabelDecoder, SessionStore};
use crate::Result;

use super::inference::{ArtifactInference, InferenceAdapter};

/// Request handler for form submissions.
///
/// Holds no per-user state; history lives in the `Session` passed to
/// [`PredictionService::submit`].
pub struct PredictionService<S, C, L>
where
    S: FeatureScaler,
    C: Classifier,
    L: LabelDecoder,
{
    normalizer: FieldNormalizer,
    inference: InferenceAdapter<S, C, L>,
    recommendations: &'static RecommendationTable,
}

/// Service over the JSON artifact implementations.
pub type ArtifactPredictionService = PredictionService<ScalerArtifact, ClassifierArtifact, LabelEncoder>;

impl ArtifactPredictionService {
    /// Build the service over a loaded artifact bundle.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the artifacts disagree.
    pub fn from_bundle(bundle: &ArtifactBundle) -> Result<Self> {
        Ok(Self::new(ArtifactInference::from_bundle(bundle)?))
    }
}

impl<S, C, L> PredictionService<S, C, L>
where
    S: FeatureScaler,
    C: Classifier,
    L: LabelDecoder,
{
    #[must_use]
    pub fn new(inference: InferenceAdapter<S, C, L>) -> Self {
        Self {
            normalizer: FieldNormalizer::new(inference.schema().clone()),
            inference,
            recommendations: RecommendationTable::standard(),
        }
    }

    #[must_use]
    pub fn normalizer(&self) -> &FieldNormalizer {
        &self.normalizer
    }

    /// Run the pipeline without touching any session.
    ///
    /// # Errors
    /// Returns `InvalidInput` or `SchemaMismatch`.
    pub fn predict(&self, form: &LifestyleForm) -> Result<Prediction> {
        let features = self.normalizer.normalize(form)?;
        let result = self.inference.infer(&features)?;
        let advice = self.recommendations.lookup(&result.raw_label);

        tracing::info!(
            "Prediction complete: class={}, category={}",
            result.class_index,
            result.category
        );

        Ok(Prediction::new(result, advice, features))
    }

    /// Predict and append the result to `session`.
    ///
    /// A failed submission leaves the session unchanged.
    ///
    /// # Errors
    /// Same as [`PredictionService::predict`].
    pub fn submit(&self, session: &mut Session, form: &LifestyleForm) -> Result<Prediction> {
        let prediction = self.predict(form)?;
        session.record(prediction.clone());
        Ok(prediction)
    }

    /// Predict for a session held in a store.
    ///
    /// # Errors
    /// Returns `Session` if the id is unknown, otherwise as
    /// [`PredictionService::predict`].
    pub fn submit_for<St>(&self, store: &St, session_id: &str, form: &LifestyleForm) -> Result<Prediction>
    where
        St: SessionStore<Error = StoreError>,
    {
        let mut session = store
            .load_session(session_id)?
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;
        let prediction = self.submit(&mut session, form)?;
        store.save_session(&session)?;
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::{ObesityCategory, NO_RECOMMENDATION};
    use crate::ObescanError;
    use std::path::Path;

    fn service() -> ArtifactPredictionService {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        ArtifactPredictionService::from_bundle(&ArtifactBundle::load(&dir, true).unwrap()).unwrap()
    }

    fn example_form() -> LifestyleForm {
        LifestyleForm::from_fields([
            ("Age", "25"),
            ("Gender", "Male"),
            ("Weight", "70"),
            ("CALC", "no"),
            ("FAVC", "yes"),
            ("FCVC", "2.0"),
            ("SCC", "no"),
            ("CH2O", "2.0"),
            ("family_history", "yes"),
            ("FAF", "1.0"),
            ("CAEC", "no"),
        ])
        .unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let svc = service();
        let prediction = svc.predict(&example_form()).unwrap();

        assert_eq!(
            prediction.features.values(),
            &[25.0, 1.0, 70.0, 0.0, 1.0, 2.0, 0.0, 2.0, 1.0, 1.0, 0.0]
        );
        assert_eq!(prediction.category(), ObesityCategory::NormalWeight);
        assert!(!prediction.recommendation.is_empty());
        assert_ne!(prediction.recommendation, NO_RECOMMENDATION);
    }

    #[test]
    fn test_submit_records_only_success() {
        let svc = service();
        let mut session = Session::new();

        svc.submit(&mut session, &example_form()).unwrap();
        assert_eq!(session.len(), 1);

        let mut bad = example_form();
        bad.weight = 500.0;
        assert!(matches!(
            svc.submit(&mut session, &bad),
            Err(ObescanError::InvalidInput(_))
        ));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_submit_for_store() {
        let svc = service();
        let store = InMemorySessionStore::new();
        let session = store.create_session().unwrap();

        svc.submit_for(&store, &session.id, &example_form()).unwrap();
        svc.submit_for(&store, &session.id, &example_form()).unwrap();
        assert_eq!(store.load_session(&session.id).unwrap().unwrap().len(), 2);

        assert!(matches!(
            svc.submit_for(&store, "missing", &example_form()),
            Err(ObescanError::Session(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_repeated_submissions_agree() {
        let svc = service();
        let a = svc.predict(&example_form()).unwrap();
        let b = svc.predict(&example_form()).unwrap();
        assert_eq!(a.result, b.result);
        assert_eq!(a.recommendation, b.recommendation);
        assert_ne!(a.id, b.id);
    }
}
