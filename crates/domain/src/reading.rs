//! Sensor readings reported by plant devices.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::PlantId;
use crate::time::Timestamp;

/// Kind of measurement a device can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Light,
    Temp,
    Moisture,
}

impl LogType {
    pub const ALL: [Self; 3] = [Self::Light, Self::Temp, Self::Moisture];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Temp => "temp",
            Self::Moisture => "moisture",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "temp" => Ok(Self::Temp),
            "moisture" => Ok(Self::Moisture),
            other => Err(ValidationError::InvalidLogType(other.to_string())),
        }
    }
}

/// One stored measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub plant_id: PlantId,
    pub log_type: LogType,
    pub value: f64,
    pub recorded_at: Timestamp,
}

/// A measurement as returned to the owner, without the plant and type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPoint {
    pub val: f64,
    pub time: Timestamp,
}

/// Inclusive time window for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ReadingRange {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] when `start` is after `end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Readings grouped per [`LogType`]; every type is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingsByType(BTreeMap<LogType, Vec<ReadingPoint>>);

impl ReadingsByType {
    /// Group readings, preserving the input order inside each type.
    #[must_use]
    pub fn group(readings: impl IntoIterator<Item = SensorReading>) -> Self {
        let mut map: BTreeMap<LogType, Vec<ReadingPoint>> =
            LogType::ALL.iter().map(|t| (*t, Vec::new())).collect();
        for reading in readings {
            map.entry(reading.log_type).or_default().push(ReadingPoint {
                val: reading.value,
                time: reading.recorded_at,
            });
        }
        Self(map)
    }

    #[must_use]
    pub fn get(&self, log_type: LogType) -> &[ReadingPoint] {
        self.0.get(&log_type).map_or(&[], Vec::as_slice)
    }
}
