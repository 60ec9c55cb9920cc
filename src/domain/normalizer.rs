//! Field normalizer: typed form → ordered, numerically encoded feature vector.

use std::ops::RangeInclusive;

use super::{Feature, FeatureSchema, FeatureVector, LifestyleForm};

/// Errors raised while turning a form into model input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl NormalizeError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Accepted domains for the continuous fields. Height is in meters.
pub const AGE_RANGE: RangeInclusive<f64> = 10.0..=100.0;
pub const WEIGHT_RANGE: RangeInclusive<f64> = 20.0..=200.0;
pub const HEIGHT_RANGE_M: RangeInclusive<f64> = 1.0..=2.5;
pub const FCVC_RANGE: RangeInclusive<f64> = 1.0..=3.0;
pub const CH2O_RANGE: RangeInclusive<f64> = 0.0..=3.0;
pub const FAF_RANGE: RangeInclusive<f64> = 0.0..=3.0;
pub const NCP_RANGE: RangeInclusive<f64> = 1.0..=4.0;
pub const TUE_RANGE: RangeInclusive<f64> = 0.0..=2.0;

fn in_range(feature: Feature, value: f64, range: &RangeInclusive<f64>) -> Result<f64, NormalizeError> {
    if !value.is_finite() {
        return Err(NormalizeError::invalid(
            feature.column_name(),
            "value must be a finite number",
        ));
    }
    if !range.contains(&value) {
        return Err(NormalizeError::invalid(
            feature.column_name(),
            format!(
                "{value} out of range [{}, {}]",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(value)
}

fn collected<T>(value: Option<T>, feature: Feature) -> Result<T, NormalizeError> {
    value.ok_or_else(|| {
        NormalizeError::SchemaMismatch(format!(
            "model expects column '{}' but the form does not collect it",
            feature.column_name()
        ))
    })
}

/// Encodes forms for one fitted schema.
///
/// The output order is exactly `schema.columns()`, which comes from the
/// fitted artifacts. Height is always emitted in meters.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    schema: FeatureSchema,
}

impl FieldNormalizer {
    #[must_use]
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Encode a form.
    ///
    /// # Errors
    /// `InvalidInput` if a value is outside its domain, `SchemaMismatch` if
    /// the schema needs a column the form did not collect.
    pub fn normalize(&self, form: &LifestyleForm) -> Result<FeatureVector, NormalizeError> {
        let values = self
            .schema
            .columns()
            .iter()
            .map(|&feature| encode_column(form, feature))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureVector::from_parts(self.schema.columns().to_vec(), values))
    }
}

fn encode_column(form: &LifestyleForm, feature: Feature) -> Result<f64, NormalizeError> {
    match feature {
        Feature::Age => in_range(feature, f64::from(form.age), &AGE_RANGE),
        Feature::Gender => Ok(form.gender.encode()),
        Feature::Height => {
            let height = collected(form.height, feature)?;
            in_range(feature, height.meters(), &HEIGHT_RANGE_M)
        }
        Feature::Weight => in_range(feature, form.weight, &WEIGHT_RANGE),
        Feature::Calc => Ok(form.calc.encode()),
        Feature::Favc => Ok(form.favc.encode()),
        Feature::Fcvc => in_range(feature, form.fcvc, &FCVC_RANGE),
        Feature::Scc => Ok(form.scc.encode()),
        Feature::Ch2o => in_range(feature, form.ch2o, &CH2O_RANGE),
        Feature::FamilyHistory => Ok(form.family_history.encode()),
        Feature::Faf => in_range(feature, form.faf, &FAF_RANGE),
        Feature::Caec => Ok(form.caec.encode()),
        Feature::Ncp => in_range(feature, collected(form.ncp, feature)?, &NCP_RANGE),
        Feature::Smoke => Ok(collected(form.smoke, feature)?.encode()),
        Feature::Tue => in_range(feature, collected(form.tue, feature)?, &TUE_RANGE),
        Feature::Mtrans => Ok(collected(form.mtrans, feature)?.encode()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSet, HeightInput};

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
        .expect("Should parse")
    }

    #[test]
    fn test_compact_vector_matches_declared_order() {
        let normalizer = FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Compact));
        let vector = normalizer.normalize(&example_form()).expect("Should normalize");
        assert_eq!(
            vector.values(),
            &[25.0, 1.0, 70.0, 0.0, 1.0, 2.0, 0.0, 2.0, 1.0, 1.0, 0.0]
        );
        assert_eq!(vector.columns(), FieldSet::Compact.columns());
    }

    #[test]
    fn test_order_follows_schema() {
        let schema = FeatureSchema::from_column_names(&["Weight", "Gender", "Age"]).unwrap();
        let vector = FieldNormalizer::new(schema)
            .normalize(&example_form())
            .expect("Should normalize");
        assert_eq!(vector.values(), &[70.0, 1.0, 25.0]);
    }

    #[test]
    fn test_height_converted_to_meters() {
        let normalizer =
            FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Anthropometric));

        let mut form = example_form();
        form.height = Some(HeightInput::Centimeters(170.0));
        let cm = normalizer.normalize(&form).unwrap();
        assert!((cm.get(Feature::Height).unwrap() - 1.70).abs() < 1e-12);

        form.height = Some(HeightInput::Meters(1.70));
        let m = normalizer.normalize(&form).unwrap();
        assert!((m.get(Feature::Height).unwrap() - 1.70).abs() < 1e-12);
    }

    #[test]
    fn test_height_in_wrong_unit_is_rejected() {
        let normalizer =
            FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Anthropometric));
        let mut form = example_form();
        // 170 "meters"
        form.height = Some(HeightInput::Meters(170.0));
        assert!(matches!(
            normalizer.normalize(&form),
            Err(NormalizeError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_missing_collected_field_is_schema_mismatch() {
        let normalizer = FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Extended));
        let err = normalizer.normalize(&example_form()).unwrap_err();
        assert!(matches!(err, NormalizeError::SchemaMismatch(_)));
    }

    #[test]
    fn test_extended_form_encodes_all_columns() {
        let normalizer = FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Extended));
        let vector = normalizer
            .normalize(&LifestyleForm::sample())
            .expect("Should normalize");
        assert_eq!(vector.len(), 16);
        assert_eq!(vector.get(Feature::Mtrans), Some(0.0));
        assert_eq!(vector.get(Feature::Smoke), Some(0.0));
        assert!((vector.get(Feature::Height).unwrap() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_vector_has_one_value_per_schema_column() {
        for set in FieldSet::ALL {
            let schema = FeatureSchema::from_field_set(set);
            let vector = FieldNormalizer::new(schema.clone())
                .normalize(&LifestyleForm::sample())
                .expect("Should normalize");
            assert_eq!(vector.len(), schema.len());
            assert_eq!(vector.columns(), schema.columns());
        }
    }

    #[test]
    fn test_out_of_range_values() {
        let normalizer = FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Compact));

        let mut form = example_form();
        form.age = 9;
        assert!(normalizer.normalize(&form).is_err());

        let mut form = example_form();
        form.fcvc = 3.5;
        assert!(normalizer.normalize(&form).is_err());

        let mut form = example_form();
        form.weight = f64::NAN;
        assert!(normalizer.normalize(&form).is_err());
    }

    #[test]
    fn test_binary_and_ordinal_outputs_stay_in_domain() {
        let normalizer = FieldNormalizer::new(FeatureSchema::from_field_set(FieldSet::Compact));
        let vector = normalizer.normalize(&example_form()).unwrap();
        for feature in [Feature::Gender, Feature::Favc, Feature::Scc, Feature::FamilyHistory] {
            let v = vector.get(feature).unwrap();
            assert!(v == 0.0 || v == 1.0);
        }
        for feature in [Feature::Calc, Feature::Caec] {
            let v = vector.get(feature).unwrap();
            assert!([0.0, 1.0, 2.0, 3.0].contains(&v));
        }
    }
}
