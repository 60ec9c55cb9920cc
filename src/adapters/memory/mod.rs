//! In-memory adapter: process-lifetime implementation of `SessionStore`.
//!
//! Sessions are keyed by id and handed out as snapshots. Nothing is written
//! to disk; all state is gone when the process exits.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::Session;
use crate::ports::{HistoryPage, SessionStore};

/// Error type for session store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Session store backed by a `HashMap` behind a `Mutex`.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Session>>, StoreError> {
        self.sessions.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl SessionStore for InMemorySessionStore {
    type Error = StoreError;

    fn create_session(&self) -> Result<Session, Self::Error> {
        let session = Session::new();
        self.lock()?.insert(session.id.clone(), session.clone());
        tracing::debug!("Created session {}", session.id);
        Ok(session)
    }

    fn load_session(&self, id: &str) -> Result<Option<Session>, Self::Error> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn save_session(&self, session: &Session) -> Result<(), Self::Error> {
        let mut sessions = self.lock()?;
        let slot = sessions
            .get_mut(&session.id)
            .ok_or_else(|| StoreError::NotFound(session.id.clone()))?;
        *slot = session.clone();
        Ok(())
    }

    fn reset_session(&self, id: &str) -> Result<(), Self::Error> {
        self.lock()?
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .clear();
        tracing::info!("Reset session history");
        Ok(())
    }

    fn end_session(&self, id: &str) -> Result<(), Self::Error> {
        if self.lock()?.remove(id).is_some() {
            tracing::debug!("Ended session {}", id);
        }
        Ok(())
    }

    fn load_history_page(
        &self,
        id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<HistoryPage, Self::Error> {
        let sessions = self.lock()?;
        let session = sessions
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let items = session
            .history()
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(HistoryPage::new(items, session.len(), offset, limit))
    }

    fn count_sessions(&self) -> Result<usize, Self::Error> {
        Ok(self.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureVector, ObesityCategory, Prediction, PredictionResult};

    fn prediction(label: &str) -> Prediction {
        let result = PredictionResult::from_decoded(0, label).unwrap();
        Prediction::new(result, "advice", FeatureVector::from_parts(vec![], vec![]))
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        let mut a = store.create_session().unwrap();
        let b = store.create_session().unwrap();
        assert_ne!(a.id, b.id);

        a.record(prediction("Normal_Weight"));
        store.save_session(&a).unwrap();

        assert_eq!(store.load_session(&a.id).unwrap().unwrap().len(), 1);
        assert!(store.load_session(&b.id).unwrap().unwrap().is_empty());
        assert_eq!(store.count_sessions().unwrap(), 2);
    }

    #[test]
    fn test_reset_and_end() {
        let store = InMemorySessionStore::new();
        let mut s = store.create_session().unwrap();
        s.record(prediction("Obesity_Type_I"));
        store.save_session(&s).unwrap();

        store.reset_session(&s.id).unwrap();
        let reloaded = store.load_session(&s.id).unwrap().unwrap();
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.id, s.id);

        store.end_session(&s.id).unwrap();
        assert!(store.load_session(&s.id).unwrap().is_none());
        assert!(matches!(store.save_session(&s), Err(StoreError::NotFound(_))));
        assert!(matches!(store.reset_session(&s.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_history_pagination() {
        let store = InMemorySessionStore::new();
        let mut s = store.create_session().unwrap();
        for label in ["Normal_Weight", "Obesity_Type_I", "Obesity_Type_II", "Insufficient_Weight", "Overweight_Level_I"] {
            s.record(prediction(label));
        }
        store.save_session(&s).unwrap();

        let first = store.load_history_page(&s.id, 0, 2).unwrap();
        assert_eq!(first.total_count, 5);
        assert!(first.has_more);
        assert_eq!(first.items[0].category(), ObesityCategory::OverweightLevelI);
        assert_eq!(first.next_offset(), Some(2));
        assert_eq!(first.prev_offset(), None);

        let last = store.load_history_page(&s.id, 4, 2).unwrap();
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);
        assert_eq!(last.items[0].category(), ObesityCategory::NormalWeight);
        assert_eq!(last.prev_offset(), Some(2));
    }
}
