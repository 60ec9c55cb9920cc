//! Model columns, field-set presets and the ordered feature vector.
//!
//! Column names match the training data of the obesity dataset
//! (`family_history_with_overweight`, `FAVC`, ...). The order that reaches
//! the scaler is always the order declared by the fitted artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NormalizeError;

/// One model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Age in whole years
    Age,
    /// 1 = male, 0 = female
    Gender,
    /// Height in meters
    Height,
    /// Weight in kilograms
    Weight,
    /// Alcohol consumption, ordinal 0-3
    Calc,
    /// Frequent high-calorie food, binary
    Favc,
    /// Vegetable consumption, 1.0-3.0
    Fcvc,
    /// Monitors calorie intake, binary
    Scc,
    /// Water intake in liters per day
    Ch2o,
    /// Family history with overweight, binary
    FamilyHistory,
    /// Physical activity frequency
    Faf,
    /// Eating between meals, ordinal 0-3
    Caec,
    /// Number of main meals
    Ncp,
    /// Smoker, binary
    Smoke,
    /// Time using technology devices
    Tue,
    /// Transportation used, nominal 0-4
    Mtrans,
}

impl Feature {
    pub const ALL: [Feature; 16] = [
        Feature::Age,
        Feature::Gender,
        Feature::Height,
        Feature::Weight,
        Feature::Calc,
        Feature::Favc,
        Feature::Fcvc,
        Feature::Scc,
        Feature::Ch2o,
        Feature::FamilyHistory,
        Feature::Faf,
        Feature::Caec,
        Feature::Ncp,
        Feature::Smoke,
        Feature::Tue,
        Feature::Mtrans,
    ];

    /// Column name as it appears in the fitted artifacts.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::Calc => "CALC",
            Self::Favc => "FAVC",
            Self::Fcvc => "FCVC",
            Self::Scc => "SCC",
            Self::Ch2o => "CH2O",
            Self::FamilyHistory => "family_history_with_overweight",
            Self::Faf => "FAF",
            Self::Caec => "CAEC",
            Self::Ncp => "NCP",
            Self::Smoke => "SMOKE",
            Self::Tue => "TUE",
            Self::Mtrans => "MTRANS",
        }
    }

    /// Resolve a column name (case-insensitive, `family_history` accepted).
    #[must_use]
    pub fn from_column_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("family_history") {
            return Some(Self::FamilyHistory);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.column_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Field sets collected by the known form variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSet {
    /// Eleven lifestyle fields without height.
    Compact,
    /// Compact plus height.
    Anthropometric,
    /// All sixteen survey columns.
    Extended,
}

const COMPACT: [Feature; 11] = [
    Feature::Age,
    Feature::Gender,
    Feature::Weight,
    Feature::Calc,
    Feature::Favc,
    Feature::Fcvc,
    Feature::Scc,
    Feature::Ch2o,
    Feature::FamilyHistory,
    Feature::Faf,
    Feature::Caec,
];

const ANTHROPOMETRIC: [Feature; 12] = [
    Feature::Age,
    Feature::Gender,
    Feature::Height,
    Feature::Weight,
    Feature::Calc,
    Feature::Favc,
    Feature::Fcvc,
    Feature::Scc,
    Feature::Ch2o,
    Feature::FamilyHistory,
    Feature::Faf,
    Feature::Caec,
];

const EXTENDED: [Feature; 16] = [
    Feature::Gender,
    Feature::Age,
    Feature::Height,
    Feature::Weight,
    Feature::FamilyHistory,
    Feature::Favc,
    Feature::Fcvc,
    Feature::Ncp,
    Feature::Caec,
    Feature::Smoke,
    Feature::Ch2o,
    Feature::Scc,
    Feature::Faf,
    Feature::Tue,
    Feature::Calc,
    Feature::Mtrans,
];

impl FieldSet {
    pub const ALL: [FieldSet; 3] = [FieldSet::Compact, FieldSet::Anthropometric, FieldSet::Extended];

    /// Columns in the order the corresponding artifacts were fit on.
    #[must_use]
    pub fn columns(self) -> &'static [Feature] {
        match self {
            Self::Compact => &COMPACT,
            Self::Anthropometric => &ANTHROPOMETRIC,
            Self::Extended => &EXTENDED,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Anthropometric => "anthropometric",
            Self::Extended => "extended",
        }
    }

    /// Preset whose column set equals `columns`, regardless of order.
    #[must_use]
    pub fn detect(columns: &[Feature]) -> Option<Self> {
        Self::ALL.into_iter().find(|set| {
            let preset = set.columns();
            preset.len() == columns.len() && preset.iter().all(|c| columns.contains(c))
        })
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered column list expected by a fitted scaler/classifier pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<Feature>,
}

impl FeatureSchema {
    /// Build a schema from artifact column names.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` for unknown, duplicate or missing columns.
    pub fn from_column_names<S: AsRef<str>>(names: &[S]) -> Result<Self, NormalizeError> {
        if names.is_empty() {
            return Err(NormalizeError::SchemaMismatch(
                "artifacts declare no feature columns".into(),
            ));
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let feature = Feature::from_column_name(name).ok_or_else(|| {
                NormalizeError::SchemaMismatch(format!("unknown model column '{name}'"))
            })?;
            if columns.contains(&feature) {
                return Err(NormalizeError::SchemaMismatch(format!(
                    "duplicate model column '{name}'"
                )));
            }
            columns.push(feature);
        }

        Ok(Self { columns })
    }

    #[must_use]
    pub fn from_field_set(set: FieldSet) -> Self {
        Self {
            columns: set.columns().to_vec(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[Feature] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.column_name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.columns.contains(&feature)
    }

    /// Matching preset, if the column set is one of the known forms.
    #[must_use]
    pub fn field_set(&self) -> Option<FieldSet> {
        FieldSet::detect(&self.columns)
    }
}

/// Encoded model input for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    columns: Vec<Feature>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn from_parts(columns: Vec<Feature>, values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn columns(&self) -> &[Feature] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| *c == feature)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.columns.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_resolve() {
        for f in Feature::ALL {
            assert_eq!(Feature::from_column_name(f.column_name()), Some(f));
        }
        assert_eq!(
            Feature::from_column_name("family_history"),
            Some(Feature::FamilyHistory)
        );
        assert_eq!(Feature::from_column_name("calc"), Some(Feature::Calc));
        assert_eq!(Feature::from_column_name("BMI"), None);
    }

    #[test]
    fn test_field_set_sizes() {
        assert_eq!(FieldSet::Compact.columns().len(), 11);
        assert_eq!(FieldSet::Anthropometric.columns().len(), 12);
        assert_eq!(FieldSet::Extended.columns().len(), 16);
    }

    #[test]
    fn test_detect_ignores_order() {
        let mut cols = FieldSet::Compact.columns().to_vec();
        cols.reverse();
        assert_eq!(FieldSet::detect(&cols), Some(FieldSet::Compact));
        assert_eq!(FieldSet::detect(&cols[..5]), None);
    }

    #[test]
    fn test_schema_rejects_unknown_and_duplicate_columns() {
        assert!(matches!(
            FeatureSchema::from_column_names(&["Age", "BMI"]),
            Err(NormalizeError::SchemaMismatch(_))
        ));
        assert!(matches!(
            FeatureSchema::from_column_names(&["Age", "age"]),
            Err(NormalizeError::SchemaMismatch(_))
        ));
        let empty: [&str; 0] = [];
        assert!(FeatureSchema::from_column_names(&empty).is_err());
    }

    #[test]
    fn test_schema_keeps_artifact_order() {
        let schema = FeatureSchema::from_column_names(&["Weight", "Age", "Gender"]).unwrap();
        assert_eq!(
            schema.columns(),
            &[Feature::Weight, Feature::Age, Feature::Gender]
        );
        assert_eq!(schema.field_set(), None);
    }
}
