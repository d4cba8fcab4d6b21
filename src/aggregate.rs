//! Per-partition local aggregation.
//!
//! One Local Aggregator owns one byte range: it parses the records fully
//! contained in the range, classifies each event, groups by station and by
//! region, and emits a [`PartialResult`]. Aggregators never communicate with
//! each other; the reducer is the only consumer of their output.
//!
//! Parsing fails closed: a row with the wrong column count or a non-numeric
//! field is skipped and counted, never coerced.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::classify;
use crate::config::AnalysisConfig;
use crate::event::{AnomalyRecord, Event};
use crate::partition::{ByteRange, read_range};
use crate::periods;
use crate::window::{MovingAverages, RegionWindowStat};

/// Per-station counters. All fields are additive across partitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationMetrics {
    pub total_events: u64,
    pub anomaly_events: u64,
    pub multi_sensor_periods: u64,
}

impl StationMetrics {
    pub fn merge(&mut self, other: &StationMetrics) {
        self.total_events += other.total_events;
        self.anomaly_events += other.anomaly_events;
        self.multi_sensor_periods += other.multi_sensor_periods;
    }
}

/// The output of one Local Aggregator over one partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartialResult {
    /// Index of the partition this partial was derived from. The reducer
    /// keys on it to drop duplicate deliveries.
    pub partition: usize,
    pub stations: HashMap<u32, StationMetrics>,
    pub regions: HashMap<String, RegionWindowStat>,
    pub anomalies: Vec<AnomalyRecord>,
    /// Rows that failed to parse and were skipped.
    pub skipped_records: u64,
}

/// Run one Local Aggregator over one byte range of the source.
///
/// # Errors
/// Returns an error if the range cannot be read. Malformed rows inside the
/// range are skipped, not fatal.
pub fn aggregate_range(
    source: impl AsRef<Path>,
    partition: usize,
    range: ByteRange,
    config: &AnalysisConfig,
) -> Result<PartialResult> {
    let bytes = read_range(&source, range)?;
    let (events, skipped) = parse_records(&bytes);
    Ok(aggregate_events(partition, events, skipped, config))
}

/// Parse raw CSV bytes (header already excluded) into typed events.
///
/// Returns the parsed events and the number of rows skipped. Each skipped
/// row is logged at warn level.
#[must_use]
pub fn parse_records(bytes: &[u8]) -> (Vec<Event>, u64) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut events = Vec::new();
    let mut skipped = 0u64;
    for record in reader.deserialize::<Event>() {
        match record {
            Ok(event) => events.push(event),
            Err(err) => {
                skipped += 1;
                warn!(%err, "skipping malformed record");
            }
        }
    }
    (events, skipped)
}

/// The in-memory core of the Local Aggregator.
///
/// Groups events by station and region, sorts each group by timestamp, and
/// derives the per-partition metrics.
#[must_use]
pub fn aggregate_events(
    partition: usize,
    events: Vec<Event>,
    skipped_records: u64,
    config: &AnalysisConfig,
) -> PartialResult {
    let mut by_station: HashMap<u32, Vec<Event>> = HashMap::new();
    let mut by_region: HashMap<String, Vec<Event>> = HashMap::new();
    let mut anomalies = Vec::new();

    for event in events {
        if let Some(sensor) = classify::classify(&event) {
            anomalies.push(AnomalyRecord {
                timestamp: event.timestamp,
                station_id: event.station_id,
                sensor,
            });
        }
        by_region
            .entry(event.region.clone())
            .or_default()
            .push(event.clone());
        by_station.entry(event.station_id).or_default().push(event);
    }

    let mut stations = HashMap::with_capacity(by_station.len());
    for (station_id, mut group) in by_station {
        group.sort_by_key(|e| e.timestamp);
        let anomaly_events = group.iter().filter(|e| classify::is_anomalous(e)).count() as u64;
        stations.insert(
            station_id,
            StationMetrics {
                total_events: group.len() as u64,
                anomaly_events,
                multi_sensor_periods: periods::count_multi_sensor_periods(
                    &group,
                    config.period_window_minutes,
                ),
            },
        );
    }

    let mut regions = HashMap::with_capacity(by_region.len());
    for (region, mut group) in by_region {
        group.sort_by_key(|e| e.timestamp);
        let mut tracker = MovingAverages::new(config.window_size);
        for event in &group {
            tracker.observe(event);
        }
        regions.insert(region, tracker.stat());
    }

    debug!(
        partition,
        stations = stations.len(),
        regions = regions.len(),
        anomalies = anomalies.len(),
        skipped_records,
        "partition aggregated"
    );

    PartialResult {
        partition,
        stations,
        regions,
        anomalies,
        skipped_records,
    }
}
