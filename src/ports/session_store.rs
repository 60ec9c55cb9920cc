//! Session store port: Trait for per-user session state.
//!
//! State lives for the lifetime of the process only. Each session is keyed
//! by its identifier and never visible to another session.

use crate::domain::{Prediction, Session};

/// A page of a session's history with pagination metadata.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    /// Predictions in this page, most recent first
    pub items: Vec<Prediction>,
    /// Total number of predictions in the session
    pub total_count: usize,
    /// Current page offset
    pub offset: usize,
    /// Page size limit
    pub limit: usize,
    /// Whether there are more pages
    pub has_more: bool,
}

impl HistoryPage {
    #[must_use]
    pub fn new(items: Vec<Prediction>, total_count: usize, offset: usize, limit: usize) -> Self {
        let has_more = offset + items.len() < total_count;
        Self {
            items,
            total_count,
            offset,
            limit,
            has_more,
        }
    }

    /// Get the next page offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        if self.has_more {
            Some(self.offset + self.limit)
        } else {
            None
        }
    }

    /// Get the previous page offset.
    #[must_use]
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset > 0 {
            Some(self.offset.saturating_sub(self.limit))
        } else {
            None
        }
    }
}

/// Trait for session state storage.
pub trait SessionStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Start a new, empty session.
    ///
    /// # Errors
    /// Returns error if the store cannot accept the session.
    fn create_session(&self) -> Result<Session, Self::Error>;

    /// Load a snapshot of a session.
    ///
    /// # Returns
    /// `None` if no session has this id.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn load_session(&self, id: &str) -> Result<Option<Session>, Self::Error>;

    /// Replace the stored state of a session.
    ///
    /// # Errors
    /// Returns error if the session was never created or has ended.
    fn save_session(&self, session: &Session) -> Result<(), Self::Error>;

    /// Clear a session's history without ending it.
    ///
    /// # Errors
    /// Returns error if the session does not exist.
    fn reset_session(&self, id: &str) -> Result<(), Self::Error>;

    /// Destroy a session and its history.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn end_session(&self, id: &str) -> Result<(), Self::Error>;

    /// Load a page of history, most recent first.
    ///
    /// # Errors
    /// Returns error if the session does not exist.
    fn load_history_page(
        &self,
        id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<HistoryPage, Self::Error>;

    /// Number of live sessions.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn count_sessions(&self) -> Result<usize, Self::Error>;
}
