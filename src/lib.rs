//! # Stratus
//!
//! A **partition-parallel analytics engine** for meteorological sensor
//! streams. Stratus splits a bounded CSV source of station readings into
//! record-aligned byte ranges, analyzes every range independently, and merges
//! the per-partition results into one backend-independent report.
//!
//! ## What a run computes
//!
//! - **Anomaly detection** - every reading is classified against fixed
//!   per-sensor ranges; out-of-range readings are reported individually.
//! - **Region averages** - bounded sliding-window means per region and
//!   sensor, computed over non-anomalous readings in timestamp order.
//! - **Multi-sensor periods** - per station, trailing time windows in which
//!   anomalies appear on more than one distinct sensor kind.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stratus::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let config = AnalysisConfig::default();
//! let outcome = run_analysis("data/readings.csv", &RayonExecutor::default(), &config)?;
//!
//! println!("{}", outcome.report.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Partition
//!
//! A contiguous, record-aligned byte range of the source, owned exclusively
//! by one worker for the duration of a run. The [`partition`] module plans
//! ranges so that no record is ever split and the ranges reconstruct the data
//! region exactly.
//!
//! ### Local Aggregator
//!
//! One invocation of [`aggregate::aggregate_range`] per partition: parse,
//! classify, group by station and region, and emit an immutable
//! [`PartialResult`]. Aggregators share nothing and never observe each
//! other's state.
//!
//! ### Reducer
//!
//! [`reduce::reduce`] merges partials commutatively: counters sum, window
//! summaries merge count-weighted, anomalies concatenate and sort. The final
//! report is therefore identical for any partition count and any partial
//! arrival order.
//!
//! ### Partition Executor
//!
//! The only backend abstraction: run N aggregators concurrently, return each
//! partial exactly once, in any order. Three in-process backends ship with
//! the crate ([`SerialExecutor`], [`RayonExecutor`], [`WorkerPoolExecutor`]);
//! the same analytical core runs unmodified under each.
//!
//! ## Error model
//!
//! Malformed rows are skipped and counted, never coerced. A missing source
//! fails the run at planning time, and a worker failure or timeout fails the
//! whole run before reduction, so an error is never mistaken for "zero
//! anomalies".
//!
//! ## Module Overview
//!
//! - [`event`] - The parsed reading and derived record types
//! - [`classify`] - Out-of-range classification rules
//! - [`window`] - Sliding-window means and their mergeable summaries
//! - [`periods`] - Multi-sensor anomaly period detection
//! - [`partition`] - Record-aligned byte-range planning
//! - [`aggregate`] - The per-partition Local Aggregator
//! - [`reduce`] - The commutative, idempotent merge step
//! - [`executor`] - Backend abstraction and the shipped executors
//! - [`engine`] - Run orchestration and timing
//! - [`config`] - Tunables and environment overrides
//! - [`testing`] - Fixtures and assertion helpers for tests

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod event;
pub mod executor;
pub mod partition;
pub mod periods;
pub mod reduce;
pub mod testing;
pub mod window;

// General re-exports
pub use aggregate::{PartialResult, StationMetrics, aggregate_events, aggregate_range};
pub use classify::{classify, is_anomalous};
pub use config::AnalysisConfig;
pub use engine::{RunOutcome, run_analysis};
pub use event::{AnomalyRecord, Event, Sensor};
pub use executor::{PartitionExecutor, RayonExecutor, SerialExecutor, WorkerPoolExecutor};
pub use partition::{ByteRange, plan_partitions, read_range};
pub use periods::{PeriodDetector, count_multi_sensor_periods};
pub use reduce::{FinalReport, reduce};
pub use window::{MovingAverages, RegionAverages, RegionWindowStat, WindowStat};
