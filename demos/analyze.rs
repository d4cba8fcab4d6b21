//! Run one full analysis over a CSV source and print the JSON report.
//!
//! Run with: cargo run --example analyze -- data/readings.csv

use anyhow::{Result, bail};
use stratus::{AnalysisConfig, RayonExecutor, run_analysis};
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: analyze <readings.csv>");
    };

    let config = AnalysisConfig::from_env()?;
    let outcome = run_analysis(&path, &RayonExecutor::default(), &config)?;

    println!("{}", outcome.report.to_json()?);
    eprintln!(
        "{} partitions, {} events ({} anomalous) in {:.3}s",
        outcome.partitions,
        outcome.report.total_events(),
        outcome.report.anomaly_events(),
        outcome.elapsed.as_secs_f64()
    );
    Ok(())
}
