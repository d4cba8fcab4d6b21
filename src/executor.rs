//! Partition executors: backends that schedule Local Aggregators.
//!
//! The analytical core needs exactly two capabilities from a backend: run one
//! Local Aggregator invocation per byte range, concurrently or not, and hand
//! every partial result back exactly once, in any order. Everything else
//! (thread pools, task queues, remote fleets) stays behind
//! [`PartitionExecutor`], so the same aggregation and reduction code runs
//! unmodified under every backend.
//!
//! A worker failure or timeout aborts the whole run. There is no retry of a
//! single partition and the reducer never sees an incomplete set.

use anyhow::{Result, bail};
use rayon::prelude::*;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::debug;

use crate::aggregate::{PartialResult, aggregate_range};
use crate::config::AnalysisConfig;
use crate::partition::ByteRange;

/// Capability required from any parallel backend.
pub trait PartitionExecutor: Send + Sync {
    /// Run one Local Aggregator per range and collect every partial result
    /// exactly once, in any order.
    ///
    /// # Errors
    /// Any worker failure aborts the run; no partial credit.
    fn run(
        &self,
        source: &Path,
        ranges: &[ByteRange],
        config: &AnalysisConfig,
    ) -> Result<Vec<PartialResult>>;

    /// Short backend name for logs and benchmark output.
    fn name(&self) -> &'static str;
}

/// Processes partitions one at a time on the calling thread.
///
/// The baseline backend every parallel backend is compared against.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialExecutor;

impl PartitionExecutor for SerialExecutor {
    fn run(
        &self,
        source: &Path,
        ranges: &[ByteRange],
        config: &AnalysisConfig,
    ) -> Result<Vec<PartialResult>> {
        ranges
            .iter()
            .enumerate()
            .map(|(idx, &range)| aggregate_range(source, idx, range, config))
            .collect()
    }

    fn name(&self) -> &'static str {
        "serial"
    }
}

/// Data-parallel executor on the Rayon work-stealing pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonExecutor {
    /// Worker thread count; `None` uses the global pool default.
    pub threads: Option<usize>,
}

impl PartitionExecutor for RayonExecutor {
    fn run(
        &self,
        source: &Path,
        ranges: &[ByteRange],
        config: &AnalysisConfig,
    ) -> Result<Vec<PartialResult>> {
        if let Some(t) = self.threads {
            // ok() to ignore "already built" on repeated calls in tests
            rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build_global()
                .ok();
        }
        ranges
            .par_iter()
            .enumerate()
            .map(|(idx, &range)| aggregate_range(source, idx, range, config))
            .collect()
    }

    fn name(&self) -> &'static str {
        "rayon"
    }
}

/// Fixed fleet of OS threads fed through an in-process task queue.
///
/// Models a message-queue worker deployment: partition assignments go out
/// over one channel, partials come back over another, and the collector
/// enforces a bounded report deadline per partial. A worker that fails or
/// does not report within `timeout` fails the run.
#[derive(Clone, Debug)]
pub struct WorkerPoolExecutor {
    pub workers: usize,
    /// Deadline for each partial result to arrive at the collector.
    pub timeout: Duration,
}

impl Default for WorkerPoolExecutor {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(2),
            timeout: Duration::from_secs(60),
        }
    }
}

impl PartitionExecutor for WorkerPoolExecutor {
    fn run(
        &self,
        source: &Path,
        ranges: &[ByteRange],
        config: &AnalysisConfig,
    ) -> Result<Vec<PartialResult>> {
        if ranges.is_empty() {
            return Ok(Vec::new());
        }

        let (task_tx, task_rx) = mpsc::channel::<(usize, ByteRange)>();
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (result_tx, result_rx) = mpsc::channel::<Result<PartialResult>>();

        for (idx, &range) in ranges.iter().enumerate() {
            task_tx.send((idx, range)).expect("task channel open");
        }
        drop(task_tx);

        let workers = self.workers.clamp(1, ranges.len());
        debug!(workers, partitions = ranges.len(), "spawning worker fleet");
        for _ in 0..workers {
            let task_rx = Arc::clone(&task_rx);
            let result_tx = result_tx.clone();
            let source = source.to_path_buf();
            let config = config.clone();
            thread::spawn(move || {
                loop {
                    let task = task_rx.lock().unwrap().recv();
                    let Ok((idx, range)) = task else { break };
                    let partial = aggregate_range(&source, idx, range, &config);
                    if result_tx.send(partial).is_err() {
                        // Collector gave up on the run; nothing left to report to.
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut partials = Vec::with_capacity(ranges.len());
        for _ in 0..ranges.len() {
            match result_rx.recv_timeout(self.timeout) {
                Ok(Ok(partial)) => partials.push(partial),
                Ok(Err(err)) => return Err(err.context("partition worker failed")),
                Err(_) => bail!("partition worker did not report within {:?}", self.timeout),
            }
        }
        Ok(partials)
    }

    fn name(&self) -> &'static str {
        "worker-pool"
    }
}
