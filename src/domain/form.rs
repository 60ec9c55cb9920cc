//! Typed lifestyle form, as submitted by the user.

use serde::{Deserialize, Serialize};

use super::fields::{Frequency, Gender, HeightInput, Transport, UnknownToken, YesNo};
use super::{Feature, NormalizeError};

/// One form submission.
///
/// Core fields are always collected; height and the extended survey fields
/// are only present on the form variants that ask for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleForm {
    /// Age in whole years (10-100)
    pub age: u32,
    pub gender: Gender,
    /// Height, in whichever unit the user typed it
    pub height: Option<HeightInput>,
    /// Weight in kg (20-200)
    pub weight: f64,
    /// Alcohol consumption (CALC)
    pub calc: Frequency,
    /// Frequent high-calorie food (FAVC)
    pub favc: YesNo,
    /// Vegetable consumption, 1.0-3.0 (FCVC)
    pub fcvc: f64,
    /// Monitors calories (SCC)
    pub scc: YesNo,
    /// Water, liters/day, 0.0-3.0 (CH2O)
    pub ch2o: f64,
    pub family_history: YesNo,
    /// Weekly physical activity, 0.0-3.0 (FAF)
    pub faf: f64,
    /// Snacking between meals (CAEC)
    pub caec: Frequency,
    /// Main meals per day, 1-4 (NCP)
    pub ncp: Option<f64>,
    pub smoke: Option<YesNo>,
    /// Device usage, 0-2 (TUE)
    pub tue: Option<f64>,
    pub mtrans: Option<Transport>,
}

impl LifestyleForm {
    /// Representative submission covering every field.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: 25,
            gender: Gender::Male,
            height: Some(HeightInput::Centimeters(175.0)),
            weight: 70.0,
            calc: Frequency::Never,
            favc: YesNo::Yes,
            fcvc: 2.0,
            scc: YesNo::No,
            ch2o: 2.0,
            family_history: YesNo::Yes,
            faf: 1.0,
            caec: Frequency::Never,
            ncp: Some(3.0),
            smoke: Some(YesNo::No),
            tue: Some(1.0),
            mtrans: Some(Transport::PublicTransportation),
        }
    }

    /// Parse a raw name → value map, as posted by a form front end.
    ///
    /// Keys are model column names (`Age`, `CALC`, ...) or `family_history`.
    /// Height is `height_cm` (centimeters) or `Height`/`height_m` (meters).
    ///
    /// # Errors
    /// Returns `InvalidInput` for unparseable values, unknown keys or a
    /// missing core field.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw = RawFields::default();

        for (key, value) in fields {
            let key = key.trim();
            if key.eq_ignore_ascii_case("height_cm") {
                raw.height = Some(HeightInput::Centimeters(parse_number("Height", value)?));
                continue;
            }
            if key.eq_ignore_ascii_case("height_m") {
                raw.height = Some(HeightInput::Meters(parse_number("Height", value)?));
                continue;
            }

            let feature = Feature::from_column_name(key).ok_or_else(|| {
                NormalizeError::invalid(key, "not a form field")
            })?;

            match feature {
                Feature::Age => {
                    raw.age = Some(value.trim().parse::<u32>().map_err(|_| {
                        NormalizeError::invalid("Age", format!("'{value}' is not a whole number"))
                    })?);
                }
                Feature::Gender => raw.gender = Some(parse_token(feature, value)?),
                Feature::Height => {
                    raw.height = Some(HeightInput::Meters(parse_number("Height", value)?));
                }
                Feature::Weight => raw.weight = Some(parse_number("Weight", value)?),
                Feature::Calc => raw.calc = Some(parse_token(feature, value)?),
                Feature::Favc => raw.favc = Some(parse_token(feature, value)?),
                Feature::Fcvc => raw.fcvc = Some(parse_number("FCVC", value)?),
                Feature::Scc => raw.scc = Some(parse_token(feature, value)?),
                Feature::Ch2o => raw.ch2o = Some(parse_number("CH2O", value)?),
                Feature::FamilyHistory => raw.family_history = Some(parse_token(feature, value)?),
                Feature::Faf => raw.faf = Some(parse_number("FAF", value)?),
                Feature::Caec => raw.caec = Some(parse_token(feature, value)?),
                Feature::Ncp => raw.ncp = Some(parse_number("NCP", value)?),
                Feature::Smoke => raw.smoke = Some(parse_token(feature, value)?),
                Feature::Tue => raw.tue = Some(parse_number("TUE", value)?),
                Feature::Mtrans => raw.mtrans = Some(parse_token(feature, value)?),
            }
        }

        raw.finish()
    }
}

#[derive(Default)]
struct RawFields {
    age: Option<u32>,
    gender: Option<Gender>,
    height: Option<HeightInput>,
    weight: Option<f64>,
    calc: Option<Frequency>,
    favc: Option<YesNo>,
    fcvc: Option<f64>,
    scc: Option<YesNo>,
    ch2o: Option<f64>,
    family_history: Option<YesNo>,
    faf: Option<f64>,
    caec: Option<Frequency>,
    ncp: Option<f64>,
    smoke: Option<YesNo>,
    tue: Option<f64>,
    mtrans: Option<Transport>,
}

impl RawFields {
    fn finish(self) -> Result<LifestyleForm, NormalizeError> {
        Ok(LifestyleForm {
            age: required(self.age, Feature::Age)?,
            gender: required(self.gender, Feature::Gender)?,
            height: self.height,
            weight: required(self.weight, Feature::Weight)?,
            calc: required(self.calc, Feature::Calc)?,
            favc: required(self.favc, Feature::Favc)?,
            fcvc: required(self.fcvc, Feature::Fcvc)?,
            scc: required(self.scc, Feature::Scc)?,
            ch2o: required(self.ch2o, Feature::Ch2o)?,
            family_history: required(self.family_history, Feature::FamilyHistory)?,
            faf: required(self.faf, Feature::Faf)?,
            caec: required(self.caec, Feature::Caec)?,
            ncp: self.ncp,
            smoke: self.smoke,
            tue: self.tue,
            mtrans: self.mtrans,
        })
    }
}

fn required<T>(value: Option<T>, feature: Feature) -> Result<T, NormalizeError> {
    value.ok_or_else(|| NormalizeError::invalid(feature.column_name(), "value is required"))
}

fn parse_number(field: &str, value: &str) -> Result<f64, NormalizeError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| NormalizeError::invalid(field, format!("'{value}' is not a number")))
}

fn parse_token<T>(feature: Feature, value: &str) -> Result<T, NormalizeError>
where
    T: std::str::FromStr<Err = UnknownToken>,
{
    value
        .parse::<T>()
        .map_err(|e| NormalizeError::invalid(feature.column_name(), e.to_string()))
}
