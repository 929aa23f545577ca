//! Schema definitions: input validation and output contracts.
//!
//! Inputs are checked field by field with [`Validator`]; a passing input is wrapped
//! in [`Validated`], the only form the generation adapter accepts. Outputs are
//! described by [`OutputSchema`] descriptors that are both sent to the service and
//! used to check what comes back.

mod contract;

pub use contract::*;

use std::fmt;
use std::ops::Deref;

use thiserror::Error;

/// The rule a field broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Required,
    NonEmpty,
    MinLength(usize),
    PositiveInteger,
    PositiveNumber,
    OneOf(&'static [&'static str]),
    ExpectedType(&'static str),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => f.write_str("is required"),
            Constraint::NonEmpty => f.write_str("must not be empty"),
            Constraint::MinLength(n) => write!(f, "must be at least {} characters", n),
            Constraint::PositiveInteger => f.write_str("must be a positive integer"),
            Constraint::PositiveNumber => f.write_str("must be a positive number"),
            Constraint::OneOf(values) => write!(f, "must be one of: {}", values.join(", ")),
            Constraint::ExpectedType(ty) => write!(f, "must be of type {}", ty),
        }
    }
}

/// One field-level violation. `field` uses the wire (camelCase) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub constraint: Constraint,
}

impl FieldError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.constraint)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Input rejected before any external call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid input: {}", join_field_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            errors: vec![FieldError::new(field, constraint)],
        }
    }

    /// True if `field` is among the offending fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Collects field errors for one input.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, constraint: Constraint) {
        self.errors.push(FieldError::new(field, constraint));
    }

    pub fn non_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, Constraint::NonEmpty);
        }
        self
    }

    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len == 0 {
            self.push(field, Constraint::NonEmpty);
        } else if len < min {
            self.push(field, Constraint::MinLength(min));
        }
        self
    }

    pub fn positive_integer(&mut self, field: &str, value: i64) -> &mut Self {
        if value <= 0 {
            self.push(field, Constraint::PositiveInteger);
        }
        self
    }

    pub fn positive_number(&mut self, field: &str, value: f64) -> &mut Self {
        if !(value.is_finite() && value > 0.0) {
            self.push(field, Constraint::PositiveNumber);
        }
        self
    }

    /// At least one entry, and no blank entries.
    pub fn non_empty_list<S: AsRef<str>>(&mut self, field: &str, values: &[S]) -> &mut Self {
        if values.is_empty() {
            self.push(field, Constraint::NonEmpty);
            return self;
        }
        for (i, value) in values.iter().enumerate() {
            if value.as_ref().trim().is_empty() {
                self.push(format!("{}[{}]", field, i), Constraint::NonEmpty);
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

/// Field-level validation for an input record.
pub trait Validate: Sized {
    fn check(&self, validator: &mut Validator);

    fn validate(self) -> Result<Validated<Self>, ValidationError> {
        let mut validator = Validator::new();
        self.check(&mut validator);
        validator.finish()?;
        Ok(Validated(self))
    }
}

/// An input that has passed [`Validate::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T>(T);

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}
