//! Acceptance coefficient
//!
//! Change detection compares coefficients by their canonical string, never
//! numerically, so the value written to the cache and the value compared
//! against it always go through [`Coefficient::canonical`].

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finite acceptance coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Coefficient(f64);

impl Coefficient {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ValidationError::NonFiniteCoefficient { value })
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Shortest decimal string that round-trips to the same `f64`.
    ///
    /// Never uses exponent notation. `-0.0` renders as `"-0"` and is
    /// therefore distinct from `0.0`.
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }

    /// Exact comparison against a previously stored canonical string.
    pub fn matches_canonical(&self, stored: &str) -> bool {
        self.canonical() == stored
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Coefficient {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Coefficient> for f64 {
    fn from(c: Coefficient) -> Self {
        c.0
    }
}
