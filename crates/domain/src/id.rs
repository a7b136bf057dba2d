//! Typed identifier newtypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Upper bound (exclusive) of the numeric part of provisioned plant ids.
pub const PLANT_SERIAL_SPACE: u32 = 100_000;

/// Identifier printed on a physical plant device.
///
/// Opaque to the system: any non-blank string is accepted so that ids issued
/// by earlier provisioning runs keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlantId(String);

impl PlantId {
    /// Wrap a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `value` is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField("plantId"));
        }
        Ok(Self(value))
    }

    /// Build the canonical `plant_NNNNN` id for a provisioning serial.
    #[must_use]
    pub fn from_serial(serial: u32) -> Self {
        Self(format!("plant_{:05}", serial % PLANT_SERIAL_SPACE))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlantId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PlantId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlantId> for String {
    fn from(value: PlantId) -> Self {
        value.0
    }
}

/// Identifier of a user account, assigned by the relational store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
