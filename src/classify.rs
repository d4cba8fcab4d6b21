//! Out-of-range classification for sensor readings.
//!
//! Classification is a pure function of one [`Event`]: sensors are checked in
//! a fixed order (temperature, then humidity, then pressure) and the first
//! out-of-range sensor wins. A reading reports at most one sensor even when
//! several fields are out of range; downstream ground-truth comparison relies
//! on that policy.

use crate::event::{Event, Sensor};

/// Temperature bounds are inclusive: the data generator emits anomalous
/// extremes of exactly -10.0 and 45.0.
pub const TEMPERATURE_MIN: f64 = -10.0;
pub const TEMPERATURE_MAX: f64 = 45.0;

pub const HUMIDITY_MIN: f64 = 0.0;
pub const HUMIDITY_MAX: f64 = 100.0;

pub const PRESSURE_MIN: f64 = 950.0;
pub const PRESSURE_MAX: f64 = 1070.0;

/// Classify one reading, returning the first out-of-range sensor if any.
#[must_use]
pub fn classify(event: &Event) -> Option<Sensor> {
    if event.temperature <= TEMPERATURE_MIN || event.temperature >= TEMPERATURE_MAX {
        return Some(Sensor::Temperature);
    }
    if event.humidity < HUMIDITY_MIN || event.humidity > HUMIDITY_MAX {
        return Some(Sensor::Humidity);
    }
    if event.pressure < PRESSURE_MIN || event.pressure > PRESSURE_MAX {
        return Some(Sensor::Pressure);
    }
    None
}

/// Whether any sensor of this reading is out of range.
#[must_use]
pub fn is_anomalous(event: &Event) -> bool {
    classify(event).is_some()
}
