//! Core data model: one parsed sensor reading and its derived records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed meteorological reading.
///
/// Events are parsed from one CSV row each (columns `timestamp, station_id,
/// region, temperature, humidity, pressure`) and never mutated afterwards.
/// Field order matches the source column order so Serde CSV round-trips work
/// without a header mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Reading time (ISO-8601 in the source, UTC here).
    pub timestamp: DateTime<Utc>,
    pub station_id: u32,
    pub region: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Hectopascal.
    pub pressure: f64,
}

/// The three sensor kinds a station reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Temperature,
    Humidity,
    Pressure,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sensor::Temperature => write!(f, "temperature"),
            Sensor::Humidity => write!(f, "humidity"),
            Sensor::Pressure => write!(f, "pressure"),
        }
    }
}

/// One detected anomalous reading.
///
/// The union of all partitions' anomaly records is the engine's reported
/// anomaly set, comparable against externally generated ground truth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub timestamp: DateTime<Utc>,
    pub station_id: u32,
    pub sensor: Sensor,
}
