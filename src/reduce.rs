//! Merging partial results into the final report.
//!
//! The reduction is associative and commutative: station counters are summed
//! field-wise, region window summaries are merged count-weighted, and the
//! anomaly list is concatenated then sorted, so the report does not depend on
//! the order in which partials arrive. Partials are keyed by partition index
//! and duplicates are dropped, which keeps the merge idempotent under
//! at-least-once delivery.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::warn;

use crate::aggregate::{PartialResult, StationMetrics};
use crate::config::AnalysisConfig;
use crate::event::AnomalyRecord;
use crate::window::{RegionAverages, RegionWindowStat};

/// The merged output for an entire run. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub stations: BTreeMap<u32, StationMetrics>,
    pub regions: BTreeMap<String, RegionAverages>,
    pub anomalies: Vec<AnomalyRecord>,
    /// Rows dropped during parsing, summed across partitions.
    pub skipped_records: u64,
}

impl FinalReport {
    /// Successfully parsed records across all stations.
    #[must_use]
    pub fn total_events(&self) -> u64 {
        self.stations.values().map(|m| m.total_events).sum()
    }

    /// Anomalous records across all stations.
    #[must_use]
    pub fn anomaly_events(&self) -> u64 {
        self.stations.values().map(|m| m.anomaly_events).sum()
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize report to JSON")
    }

    /// Save the report to a JSON file for offline inspection.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(self.to_json()?.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

/// Merge partial results into a [`FinalReport`].
///
/// A partial whose partition index was already merged is dropped with a
/// warning; every other value merges commutatively. Partials are merged in
/// partition order regardless of arrival order, which keeps even the
/// floating-point sums bit-identical across backends.
#[must_use]
pub fn reduce(mut partials: Vec<PartialResult>, config: &AnalysisConfig) -> FinalReport {
    partials.sort_by_key(|p| p.partition);

    let mut stations: BTreeMap<u32, StationMetrics> = BTreeMap::new();
    let mut regions: BTreeMap<String, RegionWindowStat> = BTreeMap::new();
    let mut anomalies: Vec<AnomalyRecord> = Vec::new();
    let mut skipped_records = 0u64;
    let mut seen: HashSet<usize> = HashSet::new();

    for partial in partials {
        if !seen.insert(partial.partition) {
            warn!(
                partition = partial.partition,
                "dropping duplicate partial result"
            );
            continue;
        }
        for (station_id, metrics) in &partial.stations {
            stations.entry(*station_id).or_default().merge(metrics);
        }
        for (region, stat) in &partial.regions {
            regions.entry(region.clone()).or_default().merge(stat);
        }
        anomalies.extend(partial.anomalies);
        skipped_records += partial.skipped_records;
    }

    anomalies.sort_by_key(|a| (a.timestamp, a.station_id, a.sensor));

    let regions = regions
        .into_iter()
        .map(|(region, stat)| (region, stat.into_averages(config.window_size)))
        .collect();

    FinalReport {
        stations,
        regions,
        anomalies,
        skipped_records,
    }
}
