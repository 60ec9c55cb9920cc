//! Static advisory text per obesity category.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::ObesityCategory;

/// Returned for labels outside the closed category set.
pub const NO_RECOMMENDATION: &str = "No recommendation available for this result.";

static STANDARD_TABLE: OnceLock<RecommendationTable> = OnceLock::new();

/// Read-only mapping from category to advice, built once per process.
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    entries: HashMap<ObesityCategory, &'static str>,
}

impl RecommendationTable {
    /// The process-wide table.
    #[must_use]
    pub fn standard() -> &'static RecommendationTable {
        STANDARD_TABLE.get_or_init(|| {
            let entries = ObesityCategory::ALL
                .into_iter()
                .map(|c| (c, standard_text(c)))
                .collect();
            Self { entries }
        })
    }

    /// Advice for a category label as produced by the encoder.
    ///
    /// Accepts underscore or space separated labels. Unknown labels get
    /// [`NO_RECOMMENDATION`].
    #[must_use]
    pub fn lookup(&self, label: &str) -> &'static str {
        ObesityCategory::from_label(label)
            .and_then(|c| self.entries.get(&c).copied())
            .unwrap_or(NO_RECOMMENDATION)
    }

    #[must_use]
    pub fn for_category(&self, category: ObesityCategory) -> &'static str {
        self.entries
            .get(&category)
            .copied()
            .unwrap_or(NO_RECOMMENDATION)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn standard_text(category: ObesityCategory) -> &'static str {
    match category {
        ObesityCategory::InsufficientWeight => {
            "Increase energy intake with nutrient-dense meals and regular snacks, include protein at every meal, and add strength training to build lean mass. Consider a check-up to rule out underlying causes."
        }
        ObesityCategory::NormalWeight => {
            "Keep up the current habits: a balanced diet with plenty of vegetables, enough water, and at least 150 minutes of moderate activity per week."
        }
        ObesityCategory::OverweightLevelI => {
            "Cut back on high-calorie foods and sugary drinks, watch portion sizes, and aim for 30 minutes of physical activity on most days."
        }
        ObesityCategory::OverweightLevelII => {
            "Plan meals around vegetables and lean protein, limit snacking between meals and alcohol, and build up to daily aerobic exercise. Tracking calories helps."
        }
        ObesityCategory::ObesityTypeI => {
            "Start a structured weight-loss plan with a calorie deficit and regular exercise. Talk to a doctor or dietitian about a realistic target."
        }
        ObesityCategory::ObesityTypeII => {
            "Seek guidance from a healthcare professional. A supervised diet and activity program is recommended, and screening for blood pressure, blood sugar and cholesterol is advised."
        }
        ObesityCategory::ObesityTypeIII => {
            "Consult a doctor promptly. Severe obesity carries high health risk; medical supervision, a specialist nutrition plan and evaluation of further treatment options are recommended."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_advice() {
        let table = RecommendationTable::standard();
        assert_eq!(table.len(), ObesityCategory::ALL.len());
        for c in ObesityCategory::ALL {
            let text = table.lookup(c.label());
            assert!(!text.is_empty());
            assert_ne!(text, NO_RECOMMENDATION);
            assert_eq!(text, table.for_category(c));
        }
    }

    #[test]
    fn test_encoder_labels_resolve() {
        let table = RecommendationTable::standard();
        assert_eq!(
            table.lookup("Normal_Weight"),
            table.for_category(ObesityCategory::NormalWeight)
        );
    }

    #[test]
    fn test_unknown_label_falls_back() {
        let table = RecommendationTable::standard();
        assert_eq!(table.lookup("Obesity Type IV"), NO_RECOMMENDATION);
        assert_eq!(table.lookup(""), NO_RECOMMENDATION);
    }

    #[test]
    fn test_table_is_shared() {
        assert!(std::ptr::eq(
            RecommendationTable::standard(),
            RecommendationTable::standard()
        ));
    }
}
