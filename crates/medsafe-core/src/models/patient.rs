//! Patient profile models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::{Constraint, Validate, ValidationError, Validator};

/// Patient sex as captured by the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub const NAMES: &'static [&'static str] = &["male", "female", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    /// Parse a wire value, reporting violations against `field`.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            "other" => Ok(Sex::Other),
            _ => Err(ValidationError::single(field, Constraint::OneOf(Self::NAMES))),
        }
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("sex", s)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Degree of renal impairment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenalFunction {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl RenalFunction {
    pub const NAMES: &'static [&'static str] = &["normal", "mild", "moderate", "severe"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenalFunction::Normal => "normal",
            RenalFunction::Mild => "mild",
            RenalFunction::Moderate => "moderate",
            RenalFunction::Severe => "severe",
        }
    }

    /// Parse a wire value, reporting violations against `field`.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(RenalFunction::Normal),
            "mild" => Ok(RenalFunction::Mild),
            "moderate" => Ok(RenalFunction::Moderate),
            "severe" => Ok(RenalFunction::Severe),
            _ => Err(ValidationError::single(field, Constraint::OneOf(Self::NAMES))),
        }
    }
}

impl FromStr for RenalFunction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("renalFunction", s)
    }
}

impl fmt::Display for RenalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-scoped patient descriptor. Every field is optional; an empty profile
/// means "no profile".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renal_function: Option<RenalFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_conditions: Option<String>,
}

impl PatientProfile {
    /// True when no field carries a usable value. Agrees with the prompt
    /// formatter: such a profile renders as "no patient details".
    pub fn is_empty(&self) -> bool {
        self.age_years().is_none()
            && self.sex.is_none()
            && self.weight_kg().is_none()
            && self.renal_function.is_none()
            && self.conditions().is_none()
    }

    /// Age, if positive.
    pub fn age_years(&self) -> Option<i64> {
        self.age.filter(|a| *a > 0)
    }

    /// Weight, if finite and positive.
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight.filter(|w| w.is_finite() && *w > 0.0)
    }

    /// Other conditions, if any non-blank text was entered.
    pub fn conditions(&self) -> Option<&str> {
        self.other_conditions
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl Validate for PatientProfile {
    fn check(&self, validator: &mut Validator) {
        if let Some(age) = self.age {
            validator.positive_integer("age", age);
        }
        if let Some(weight) = self.weight {
            validator.positive_number("weight", weight);
        }
    }
}
