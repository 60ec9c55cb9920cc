//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: field encodings, the feature schema, the
//! normalizer, prediction results, advice and session state.

mod features;
pub mod fields;
mod form;
mod normalizer;
mod prediction;
mod recommendation;
mod session;

pub use features::{Feature, FeatureSchema, FeatureVector, FieldSet};
pub use fields::{Frequency, Gender, HeightInput, Transport, YesNo};
pub use form::LifestyleForm;
pub use normalizer::{
    FieldNormalizer, NormalizeError, AGE_RANGE, CH2O_RANGE, FAF_RANGE, FCVC_RANGE, HEIGHT_RANGE_M,
    NCP_RANGE, TUE_RANGE, WEIGHT_RANGE,
};
pub use prediction::{ObesityCategory, Prediction, PredictionResult};
pub use recommendation::{RecommendationTable, NO_RECOMMENDATION};
pub use session::Session;
