//! Benchmark the same analysis under every shipped backend.
//!
//! Runs the source once per executor, prints elapsed wall-clock times, and
//! cross-checks that the backends agree on the merged report.
//!
//! Run with: cargo run --release --example compare_executors -- data/readings.csv

use anyhow::{Result, bail};
use stratus::reduce::FinalReport;
use stratus::{
    AnalysisConfig, PartitionExecutor, RayonExecutor, SerialExecutor, WorkerPoolExecutor,
    run_analysis,
};
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .compact()
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: compare_executors <readings.csv>");
    };
    let config = AnalysisConfig::from_env()?;

    let backends: Vec<Box<dyn PartitionExecutor>> = vec![
        Box::new(SerialExecutor),
        Box::new(RayonExecutor::default()),
        Box::new(WorkerPoolExecutor::default()),
    ];

    println!(
        "{:<12} {:>10} {:>12} {:>10}",
        "backend", "elapsed", "events", "anomalies"
    );
    let mut baseline: Option<FinalReport> = None;
    for backend in &backends {
        let outcome = run_analysis(&path, backend.as_ref(), &config)?;
        println!(
            "{:<12} {:>9.3}s {:>12} {:>10}",
            backend.name(),
            outcome.elapsed.as_secs_f64(),
            outcome.report.total_events(),
            outcome.report.anomalies.len()
        );
        match &baseline {
            None => baseline = Some(outcome.report),
            Some(first) => {
                if *first != outcome.report {
                    bail!("backend {} disagrees with the baseline report", backend.name());
                }
            }
        }
    }
    Ok(())
}
