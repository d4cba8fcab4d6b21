//! Run orchestration: partition, execute, reduce, with timing.

use anyhow::{Result, bail};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::executor::PartitionExecutor;
use crate::partition::plan_partitions;
use crate::reduce::{FinalReport, reduce};

/// Outcome of one analysis run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Wall-clock time from partition planning through reduction.
    pub elapsed: Duration,
    /// Number of partitions actually planned.
    pub partitions: usize,
    pub report: FinalReport,
}

/// Run one full analysis of a CSV source under the given backend.
///
/// Planning fails fast on a missing source. The reducer only runs once a
/// partial result has arrived for every planned partition; an incomplete set
/// aborts the run so it is never mistaken for "zero anomalies". A source with
/// a header but no data rows yields an empty report.
///
/// # Errors
/// Returns an error on an unreadable source, a worker failure or timeout, or
/// an incomplete set of partial results.
pub fn run_analysis(
    source: impl AsRef<Path>,
    executor: &dyn PartitionExecutor,
    config: &AnalysisConfig,
) -> Result<RunOutcome> {
    let source = source.as_ref();
    let started = Instant::now();

    let ranges = plan_partitions(source, config.partitions)?;
    info!(
        backend = executor.name(),
        partitions = ranges.len(),
        source = %source.display(),
        "starting analysis run"
    );

    let partials = executor.run(source, &ranges, config)?;

    // Completeness barrier: every planned partition must have reported.
    // Duplicate deliveries are the reducer's concern, absence is fatal here.
    let mut reported = vec![false; ranges.len()];
    for partial in &partials {
        if let Some(slot) = reported.get_mut(partial.partition) {
            *slot = true;
        }
    }
    if let Some(missing) = reported.iter().position(|&done| !done) {
        bail!("no partial result for partition {missing}; refusing to reduce an incomplete run");
    }

    let report = reduce(partials, config);
    let elapsed = started.elapsed();
    info!(
        backend = executor.name(),
        elapsed_ms = elapsed.as_millis() as u64,
        total_events = report.total_events(),
        anomalies = report.anomalies.len(),
        "analysis run complete"
    );

    Ok(RunOutcome {
        elapsed,
        partitions: ranges.len(),
        report,
    })
}
