//! Categorical form fields and their fixed numeric encodings.
//!
//! Every field is an exhaustive enum, so encoding is a total `match`.
//! Parsing accepts the display tokens of both the English and the
//! Indonesian forms; the encoding direction never depends on locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A raw token that is not part of a field's option set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized option '{0}'")]
pub struct UnknownToken(pub String);

fn normalize_token(raw: &str) -> String {
    raw.trim().to_lowercase().replace('_', " ")
}

/// Biological sex as collected by the form (1 = male).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "male" | "m" | "laki-laki" | "laki laki" | "pria" => Ok(Self::Male),
            "female" | "f" | "perempuan" | "wanita" => Ok(Self::Female),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

/// Binary answer used by FAVC, SCC, SMOKE and family history (1 = yes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl FromStr for YesNo {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "yes" | "y" | "ya" | "1" | "true" => Ok(Self::Yes),
            "no" | "n" | "tidak" | "t" | "0" | "false" => Ok(Self::No),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

/// Four-point ordinal scale shared by CALC (alcohol) and CAEC (snacking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Frequency {
    Never,
    Sometimes,
    Frequently,
    Always,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Never,
        Frequency::Sometimes,
        Frequency::Frequently,
        Frequency::Always,
    ];

    #[must_use]
    pub fn encode(self) -> f64 {
        f64::from(self.ordinal())
    }

    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Never => 0,
            Self::Sometimes => 1,
            Self::Frequently => 2,
            Self::Always => 3,
        }
    }

    /// Inverse of [`Frequency::ordinal`].
    #[must_use]
    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Never),
            1 => Some(Self::Sometimes),
            2 => Some(Self::Frequently),
            3 => Some(Self::Always),
            _ => None,
        }
    }

    /// Token used by the training data (`no`, `Sometimes`, ...).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Never => "no",
            Self::Sometimes => "Sometimes",
            Self::Frequently => "Frequently",
            Self::Always => "Always",
        }
    }
}

impl FromStr for Frequency {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "no" | "none" | "never" | "tidak" => Ok(Self::Never),
            "sometimes" | "kadang-kadang" | "kadang kadang" | "kadang" => Ok(Self::Sometimes),
            "frequently" | "sering" => Ok(Self::Frequently),
            "always" | "selalu" => Ok(Self::Always),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Usual means of transport (MTRANS), nominal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    PublicTransportation,
    Walking,
    Automobile,
    Motorbike,
    Bike,
}

impl Transport {
    pub const ALL: [Transport; 5] = [
        Transport::PublicTransportation,
        Transport::Walking,
        Transport::Automobile,
        Transport::Motorbike,
        Transport::Bike,
    ];

    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::PublicTransportation => 0.0,
            Self::Walking => 1.0,
            Self::Automobile => 2.0,
            Self::Motorbike => 3.0,
            Self::Bike => 4.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PublicTransportation => "Public_Transportation",
            Self::Walking => "Walking",
            Self::Automobile => "Automobile",
            Self::Motorbike => "Motorbike",
            Self::Bike => "Bike",
        }
    }
}

impl FromStr for Transport {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "public transportation" | "transportasi umum" => Ok(Self::PublicTransportation),
            "walking" | "jalan kaki" => Ok(Self::Walking),
            "automobile" | "mobil" => Ok(Self::Automobile),
            "motorbike" | "motor" => Ok(Self::Motorbike),
            "bike" | "sepeda" => Ok(Self::Bike),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body height as entered. The model is always fed meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeightInput {
    Centimeters(f64),
    Meters(f64),
}

impl HeightInput {
    #[must_use]
    pub fn meters(self) -> f64 {
        match self {
            Self::Centimeters(cm) => cm / 100.0,
            Self::Meters(m) => m,
        }
    }
}
