//! Record-aligned byte-range partitioning of a delimited-text source.
//!
//! The partitioner splits a CSV source into non-overlapping byte ranges that
//! cover the data region exactly once, excluding the header line. Boundaries
//! are advanced to the next line terminator so no record is split across two
//! partitions; the final range absorbs any remainder up to end of file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// A half-open byte range `[start, end)` of the source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Split a source file into at most `workers` record-aligned byte ranges.
///
/// The header line is excluded from every range. Guarantees:
/// - the ranges are non-overlapping and their concatenation reconstructs the
///   data region byte for byte,
/// - no range starts mid-record,
/// - ranges are never empty (a tiny file yields fewer ranges than `workers`).
///
/// # Errors
/// Fails fast if the source is missing or unreadable, so callers never
/// mistake "no data" for an empty result.
pub fn plan_partitions(path: impl AsRef<Path>, workers: usize) -> Result<Vec<ByteRange>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let total = file
        .metadata()
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    let mut reader = BufReader::new(file);

    // The data region starts after the header line.
    let mut header = String::new();
    let data_start = reader
        .read_line(&mut header)
        .with_context(|| format!("read header of {}", path.display()))? as u64;
    if data_start >= total {
        return Ok(Vec::new());
    }

    let workers = workers.max(1) as u64;
    let chunk = ((total - data_start) / workers).max(1);

    let mut ranges = Vec::with_capacity(workers as usize);
    let mut start = data_start;
    for i in 1..workers {
        if start >= total {
            break;
        }
        let target = data_start + chunk * i;
        if target <= start {
            continue;
        }
        let end = next_record_boundary(&mut reader, target, total)
            .with_context(|| format!("align partition boundary in {}", path.display()))?;
        if end > start {
            ranges.push(ByteRange { start, end });
            start = end;
        }
    }
    if start < total {
        ranges.push(ByteRange { start, end: total });
    }
    Ok(ranges)
}

/// Advance from `target` to the position just past the next line terminator,
/// or to end of file if none remains.
fn next_record_boundary<R: Read + Seek>(reader: &mut R, target: u64, total: u64) -> Result<u64> {
    reader.seek(SeekFrom::Start(target))?;
    let mut pos = target;
    let mut buf = [0u8; 4096];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Ok(total);
        }
        if let Some(i) = buf[..n].iter().position(|&b| b == b'\n') {
            return Ok(pos + i as u64 + 1);
        }
        pos += n as u64;
    }
}

/// Read one partition's raw bytes.
///
/// The source file is read-only and safely shared by concurrent workers at
/// disjoint ranges.
///
/// # Errors
/// Returns an error if the file cannot be opened or the range cannot be read
/// in full.
pub fn read_range(path: impl AsRef<Path>, range: ByteRange) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    file.seek(SeekFrom::Start(range.start))
        .with_context(|| format!("seek to byte {} of {}", range.start, path.display()))?;
    let mut buf = vec![0u8; range.len() as usize];
    file.read_exact(&mut buf).with_context(|| {
        format!(
            "read bytes {}..{} of {}",
            range.start,
            range.end,
            path.display()
        )
    })?;
    Ok(buf)
}
