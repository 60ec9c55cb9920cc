//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and its collaborators: the externally fitted
//! model artifacts and the per-user session state.

mod model;
mod session_store;

pub use model::{Classifier, FeatureScaler, LabelDecoder, ModelError};
pub use session_store::{HistoryPage, SessionStore};
