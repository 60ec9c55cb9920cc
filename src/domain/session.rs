//! Per-user session state.
//!
//! A session owns the prediction history of one user. It is handed to the
//! request handler explicitly and never shared between users.

use serde::{Deserialize, Serialize};

use super::prediction::uuid_v4;
use super::{ObesityCategory, Prediction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier
    pub id: String,

    /// Predictions made in this session, oldest first
    history: Vec<Prediction>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(uuid_v4())
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn record(&mut self, prediction: Prediction) {
        self.history.push(prediction);
    }

    /// Drop all recorded predictions, keeping the session itself.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    #[must_use]
    pub fn history(&self) -> &[Prediction] {
        &self.history
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Prediction> {
        self.history.last()
    }

    /// Most recent predictions first, up to `limit`.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Prediction> {
        self.history.iter().rev().take(limit)
    }

    #[must_use]
    pub fn count(&self, category: ObesityCategory) -> usize {
        self.history
            .iter()
            .filter(|p| p.category() == category)
            .count()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureVector, PredictionResult};

    fn prediction(label: &str) -> Prediction {
        let result = PredictionResult::from_decoded(0, label).expect("known label");
        Prediction::new(result, "advice", FeatureVector::from_parts(vec![], vec![]))
    }

    #[test]
    fn test_record_and_recent() {
        let mut session = Session::new();
        session.record(prediction("Normal_Weight"));
        session.record(prediction("Obesity_Type_I"));
        session.record(prediction("Normal_Weight"));

        assert_eq!(session.len(), 3);
        assert_eq!(session.count(ObesityCategory::NormalWeight), 2);

        let recent: Vec<_> = session.recent(2).map(|p| p.category()).collect();
        assert_eq!(
            recent,
            vec![ObesityCategory::NormalWeight, ObesityCategory::ObesityTypeI]
        );
    }

    #[test]
    fn test_clear_keeps_identity() {
        let mut session = Session::with_id("s-1");
        session.record(prediction("Normal_Weight"));
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.id, "s-1");
        assert!(session.latest().is_none());
    }
}
