use std::fs;

use stratus::testing::{EventBuilder, temp_events_csv};
use stratus::{
    AnalysisConfig, Event, RayonExecutor, Sensor, SerialExecutor, WorkerPoolExecutor, run_analysis,
};

use tempfile::tempdir;

/// Four stations over two regions, one reading per station per minute, with
/// three seeded anomalies (one multi-sensor overlap at station 2).
fn mixed_fixture() -> Vec<Event> {
    let mut events = Vec::new();
    for minute in 0..60 {
        for (station_id, region) in [(1, "north"), (2, "north"), (3, "south"), (4, "south")] {
            let mut builder = EventBuilder::new(station_id, region).at_minutes(minute);
            if station_id == 2 && minute == 10 {
                builder = builder.temperature(60.0);
            }
            if station_id == 2 && minute == 12 {
                builder = builder.humidity(120.0);
            }
            if station_id == 3 && minute == 30 {
                builder = builder.pressure(900.0);
            }
            events.push(builder.build());
        }
    }
    events
}

#[test]
fn additive_metrics_are_partition_count_invariant() -> anyhow::Result<()> {
    let (_dir, path) = temp_events_csv(&mixed_fixture())?;

    let baseline = run_analysis(
        &path,
        &SerialExecutor,
        &AnalysisConfig {
            partitions: 1,
            ..AnalysisConfig::default()
        },
    )?;

    for partitions in [2, 3, 8] {
        let config = AnalysisConfig {
            partitions,
            ..AnalysisConfig::default()
        };
        let outcome = run_analysis(&path, &SerialExecutor, &config)?;
        let report = &outcome.report;

        assert_eq!(report.total_events(), baseline.report.total_events());
        assert_eq!(report.anomaly_events(), baseline.report.anomaly_events());
        assert_eq!(report.anomalies, baseline.report.anomalies);
        for (station_id, metrics) in &baseline.report.stations {
            let split = &report.stations[station_id];
            assert_eq!(split.total_events, metrics.total_events);
            assert_eq!(split.anomaly_events, metrics.anomaly_events);
        }
    }
    Ok(())
}

#[test]
fn all_backends_produce_the_same_report() -> anyhow::Result<()> {
    let (_dir, path) = temp_events_csv(&mixed_fixture())?;

    let config = AnalysisConfig {
        partitions: 3,
        ..AnalysisConfig::default()
    };
    let serial = run_analysis(&path, &SerialExecutor, &config)?;
    let rayon = run_analysis(&path, &RayonExecutor::default(), &config)?;
    let pool = run_analysis(
        &path,
        &WorkerPoolExecutor {
            workers: 3,
            ..WorkerPoolExecutor::default()
        },
        &config,
    )?;

    assert_eq!(serial.report, rayon.report);
    assert_eq!(serial.report, pool.report);
    assert_eq!(serial.partitions, 3);
    Ok(())
}

#[test]
fn seeded_anomalies_are_all_reported() -> anyhow::Result<()> {
    let (_dir, path) = temp_events_csv(&mixed_fixture())?;

    let config = AnalysisConfig {
        partitions: 4,
        ..AnalysisConfig::default()
    };
    let outcome = run_analysis(&path, &RayonExecutor::default(), &config)?;
    let report = &outcome.report;

    let sensors: Vec<(u32, Sensor)> = report
        .anomalies
        .iter()
        .map(|a| (a.station_id, a.sensor))
        .collect();
    assert_eq!(
        sensors,
        vec![
            (2, Sensor::Temperature),
            (2, Sensor::Humidity),
            (3, Sensor::Pressure),
        ]
    );

    assert_eq!(report.stations[&2].multi_sensor_periods, 1);
    assert_eq!(report.stations[&2].anomaly_events, 2);
    assert_eq!(report.stations[&3].anomaly_events, 1);
    assert_eq!(report.stations[&1].anomaly_events, 0);
    assert_eq!(report.total_events(), 240);
    Ok(())
}

#[test]
fn empty_source_yields_an_empty_report_not_an_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.csv");
    fs::write(
        &path,
        "timestamp,station_id,region,temperature,humidity,pressure\n",
    )?;

    let outcome = run_analysis(&path, &SerialExecutor, &AnalysisConfig::default())?;
    assert_eq!(outcome.partitions, 0);
    assert!(outcome.report.stations.is_empty());
    assert!(outcome.report.regions.is_empty());
    assert!(outcome.report.anomalies.is_empty());
    Ok(())
}

#[test]
fn missing_source_is_an_error() {
    let result = run_analysis(
        "definitely/not/here.csv",
        &SerialExecutor,
        &AnalysisConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn default_config_matches_the_documented_tunables() {
    let config = AnalysisConfig::default();
    assert_eq!(config.window_size, 50);
    assert_eq!(config.period_window_minutes, 10);
    assert!(config.partitions >= 2);
}
