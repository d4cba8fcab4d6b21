use std::fs;

use stratus::partition::{plan_partitions, read_range};
use stratus::testing::{steady_events, write_events_csv};
use tempfile::tempdir;

fn data_start(raw: &[u8]) -> usize {
    raw.iter().position(|&b| b == b'\n').expect("header line") + 1
}

#[test]
fn ranges_reconstruct_the_data_region() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("readings.csv");
    write_events_csv(&path, &steady_events(1, "north", 100))?;
    let raw = fs::read(&path)?;
    let start = data_start(&raw);

    for workers in [1, 3, 7, 16] {
        let ranges = plan_partitions(&path, workers)?;
        assert!(!ranges.is_empty());
        assert!(ranges.len() <= workers);

        let mut pos = start as u64;
        let mut reassembled = Vec::new();
        for range in &ranges {
            assert_eq!(range.start, pos, "ranges must be contiguous");
            assert!(!range.is_empty());
            pos = range.end;
            reassembled.extend(read_range(&path, *range)?);
        }
        assert_eq!(pos, raw.len() as u64, "ranges must cover to end of file");
        assert_eq!(reassembled, raw[start..]);
    }
    Ok(())
}

#[test]
fn no_range_starts_mid_record() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("readings.csv");
    write_events_csv(&path, &steady_events(9, "south", 200))?;
    let raw = fs::read(&path)?;
    let start = data_start(&raw) as u64;

    for range in plan_partitions(&path, 8)? {
        assert!(
            range.start == start || raw[range.start as usize - 1] == b'\n',
            "range starting at byte {} splits a record",
            range.start
        );
    }
    Ok(())
}

#[test]
fn more_workers_than_records_collapses_gracefully() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("tiny.csv");
    write_events_csv(&path, &steady_events(1, "north", 3))?;
    let raw = fs::read(&path)?;
    let start = data_start(&raw);

    let ranges = plan_partitions(&path, 64)?;
    assert!(ranges.len() <= 3);
    let reassembled: Vec<u8> = ranges
        .iter()
        .map(|&r| read_range(&path, r))
        .collect::<anyhow::Result<Vec<_>>>()?
        .concat();
    assert_eq!(reassembled, raw[start..]);
    Ok(())
}

#[test]
fn header_only_source_yields_no_ranges() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.csv");
    fs::write(
        &path,
        "timestamp,station_id,region,temperature,humidity,pressure\n",
    )?;
    assert!(plan_partitions(&path, 4)?.is_empty());
    Ok(())
}

#[test]
fn missing_source_fails_fast() {
    let err = plan_partitions("definitely/not/here.csv", 4);
    assert!(err.is_err());
}
