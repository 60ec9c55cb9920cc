//! Prediction result types.
//!
//! Represents the output of the obesity level classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// Obesity level, the closed set of labels the classifier was fit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObesityCategory {
    InsufficientWeight,
    NormalWeight,
    OverweightLevelI,
    OverweightLevelII,
    ObesityTypeI,
    ObesityTypeII,
    ObesityTypeIII,
}

impl ObesityCategory {
    /// All categories, lightest to heaviest.
    pub const ALL: [ObesityCategory; 7] = [
        ObesityCategory::InsufficientWeight,
        ObesityCategory::NormalWeight,
        ObesityCategory::OverweightLevelI,
        ObesityCategory::OverweightLevelII,
        ObesityCategory::ObesityTypeI,
        ObesityCategory::ObesityTypeII,
        ObesityCategory::ObesityTypeIII,
    ];

    /// Human-readable label (spaces, no underscores).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InsufficientWeight => "Insufficient Weight",
            Self::NormalWeight => "Normal Weight",
            Self::OverweightLevelI => "Overweight Level I",
            Self::OverweightLevelII => "Overweight Level II",
            Self::ObesityTypeI => "Obesity Type I",
            Self::ObesityTypeII => "Obesity Type II",
            Self::ObesityTypeIII => "Obesity Type III",
        }
    }

    /// Short label for chart axes.
    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            Self::InsufficientWeight => "Under",
            Self::NormalWeight => "Normal",
            Self::OverweightLevelI => "Over I",
            Self::OverweightLevelII => "Over II",
            Self::ObesityTypeI => "Obese I",
            Self::ObesityTypeII => "Obese II",
            Self::ObesityTypeIII => "Obese III",
        }
    }

    /// Resolve an encoder label, with or without underscores.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(&wanted))
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Self::InsufficientWeight => (59, 130, 246), // Blue (#3B82F6)
            Self::NormalWeight => (16, 185, 129),       // Emerald (#10B981)
            Self::OverweightLevelI => (234, 179, 8),    // Yellow (#EAB308)
            Self::OverweightLevelII => (251, 146, 60),  // Orange (#FB923C)
            Self::ObesityTypeI => (249, 115, 22),       // Deep orange (#F97316)
            Self::ObesityTypeII => (244, 63, 94),       // Rose (#F43F5E)
            Self::ObesityTypeIII => (190, 18, 60),      // Crimson (#BE123C)
        }
    }
}

impl fmt::Display for ObesityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ObesityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown obesity category '{s}'"))
    }
}

/// Decoded classifier output (before interpretation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Class index returned by the classifier
    pub class_index: usize,

    /// Label as stored in the encoder (e.g. `Obesity_Type_I`)
    pub raw_label: String,

    /// Display label, underscores replaced by spaces
    pub label: String,

    pub category: ObesityCategory,
}

impl PredictionResult {
    /// Build a result from a decoded encoder label.
    ///
    /// Returns `None` if the label is outside the closed category set.
    #[must_use]
    pub fn from_decoded(class_index: usize, raw_label: &str) -> Option<Self> {
        let category = ObesityCategory::from_label(raw_label)?;
        Some(Self {
            class_index,
            raw_label: raw_label.to_string(),
            label: raw_label.trim().replace('_', " "),
            category,
        })
    }
}

/// Complete prediction record including metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Unique identifier
    pub id: String,

    /// The decoded classifier result
    pub result: PredictionResult,

    /// Advisory text for the predicted category
    pub recommendation: String,

    /// Encoded input that produced this result
    pub features: FeatureVector,

    /// Timestamp of prediction
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(result: PredictionResult, recommendation: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            id: uuid_v4(),
            result,
            recommendation: recommendation.into(),
            features,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn category(&self) -> ObesityCategory {
        self.result.category
    }
}

/// Generate a UUID v4 string using a CSPRNG.
pub(crate) fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
