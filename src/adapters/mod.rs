//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: JSON-exported scaler, classifier and label encoder
//! - `memory`: process-lifetime session store
//! - `sanitize`: personal-data filtering for logs

pub mod artifacts;
pub mod memory;
pub mod sanitize;

pub use artifacts::{ArtifactBundle, ArtifactError, ArtifactManifest};
pub use memory::{InMemorySessionStore, StoreError};
