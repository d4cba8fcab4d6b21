//! Testing utilities for stratus analyses.
//!
//! Deterministic fixtures and small assertion helpers used by the crate's own
//! test suite and available to downstream users:
//!
//! - [`EventBuilder`] - fluent construction of single readings
//! - [`steady_events`] - runs of in-range readings, one per minute
//! - [`write_events_csv`] / [`temp_events_csv`] - render fixtures in the
//!   engine's input format
//! - [`assert_close`] - float comparison with a fixed tolerance
//!
//! Fixtures are hand-rolled and seed-free so every test run sees identical
//! data.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::event::Event;

/// Fixed origin timestamp shared by all fixtures.
#[must_use]
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

/// Fluent builder for one reading with steady in-range defaults.
///
/// # Example
///
/// ```
/// use stratus::testing::EventBuilder;
///
/// let event = EventBuilder::new(7, "coastal")
///     .at_minutes(3)
///     .temperature(50.0)
///     .build();
/// assert_eq!(event.station_id, 7);
/// ```
#[derive(Clone, Debug)]
pub struct EventBuilder {
    timestamp: DateTime<Utc>,
    station_id: u32,
    region: String,
    temperature: f64,
    humidity: f64,
    pressure: f64,
}

impl EventBuilder {
    #[must_use]
    pub fn new(station_id: u32, region: &str) -> Self {
        Self {
            timestamp: base_time(),
            station_id,
            region: region.to_string(),
            temperature: 20.0,
            humidity: 55.0,
            pressure: 1013.0,
        }
    }

    /// Place the reading `minutes` after [`base_time`].
    #[must_use]
    pub fn at_minutes(mut self, minutes: i64) -> Self {
        self.timestamp = base_time() + Duration::minutes(minutes);
        self
    }

    /// Place the reading `seconds` after [`base_time`].
    #[must_use]
    pub fn at_seconds(mut self, seconds: i64) -> Self {
        self.timestamp = base_time() + Duration::seconds(seconds);
        self
    }

    #[must_use]
    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = value;
        self
    }

    #[must_use]
    pub fn humidity(mut self, value: f64) -> Self {
        self.humidity = value;
        self
    }

    #[must_use]
    pub fn pressure(mut self, value: f64) -> Self {
        self.pressure = value;
        self
    }

    #[must_use]
    pub fn build(self) -> Event {
        Event {
            timestamp: self.timestamp,
            station_id: self.station_id,
            region: self.region,
            temperature: self.temperature,
            humidity: self.humidity,
            pressure: self.pressure,
        }
    }
}

/// A run of `count` in-range readings for one station, one per minute.
#[must_use]
pub fn steady_events(station_id: u32, region: &str, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            EventBuilder::new(station_id, region)
                .at_minutes(i as i64)
                .build()
        })
        .collect()
}

/// Write events in the engine's CSV input format, header line included.
///
/// # Errors
/// Returns an error if the file cannot be created or a row fails to
/// serialize.
pub fn write_events_csv(path: impl AsRef<Path>, events: &[Event]) -> Result<()> {
    let path = path.as_ref();
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for event in events {
        writer
            .serialize(event)
            .with_context(|| format!("serialize event for {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write events into a fresh temporary directory as `readings.csv`.
///
/// Returns the directory guard alongside the file path; dropping the guard
/// removes the file.
///
/// # Errors
/// See [`write_events_csv`].
pub fn temp_events_csv(events: &[Event]) -> Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("readings.csv");
    write_events_csv(&path, events)?;
    Ok((dir, path))
}

/// Assert two floats agree within `1e-9`.
///
/// # Panics
/// Panics when the values differ by more than the tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {actual} to be within 1e-9 of {expected}"
    );
}
