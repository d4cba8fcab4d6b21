//! Bounded sliding-window means over non-anomalous readings.
//!
//! Each region tracks three independent fixed-capacity FIFO windows, one per
//! sensor. Anomalous readings are skipped for window content but do not reset
//! a window. Two views are exposed:
//!
//! - [`MovingAverages::averages`] - the last mean recorded while the window
//!   was at full capacity, or `0.0` if it never filled.
//! - [`MovingAverages::stat`] - a mergeable `(sum, count)` summary of the
//!   current window contents, combined count-weighted across partitions by
//!   the reducer.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::classify;
use crate::event::Event;

/// Fixed-capacity FIFO window with a running sum (O(1) per push).
#[derive(Clone, Debug)]
struct SlidingWindow {
    cap: usize,
    values: VecDeque<f64>,
    sum: f64,
    last_full_mean: Option<f64>,
}

impl SlidingWindow {
    fn new(cap: usize) -> Self {
        debug_assert!(cap > 0);
        Self {
            cap,
            values: VecDeque::with_capacity(cap),
            sum: 0.0,
            last_full_mean: None,
        }
    }

    fn push(&mut self, value: f64) {
        if self.values.len() == self.cap
            && let Some(evicted) = self.values.pop_front()
        {
            self.sum -= evicted;
        }
        self.values.push_back(value);
        self.sum += value;
    }

    fn record_if_full(&mut self) {
        if self.values.len() == self.cap {
            self.last_full_mean = Some(self.sum / self.cap as f64);
        }
    }

    fn stat(&self) -> WindowStat {
        WindowStat {
            sum: self.sum,
            count: self.values.len() as u64,
        }
    }
}

/// Mergeable summary of one window's current contents.
///
/// - Accumulator: `(sum, count)`
/// - Output: `sum / count`, or `0.0` for an empty window
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStat {
    pub sum: f64,
    pub count: u64,
}

impl WindowStat {
    pub fn merge(&mut self, other: WindowStat) {
        self.sum += other.sum;
        self.count += other.count;
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Per-region tracker: one sliding window per sensor.
///
/// Feed events in timestamp order via [`observe`](Self::observe); the tracker
/// classifies each reading itself and only non-anomalous readings contribute
/// window content.
#[derive(Clone, Debug)]
pub struct MovingAverages {
    temperature: SlidingWindow,
    humidity: SlidingWindow,
    pressure: SlidingWindow,
}

impl MovingAverages {
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            temperature: SlidingWindow::new(window_size),
            humidity: SlidingWindow::new(window_size),
            pressure: SlidingWindow::new(window_size),
        }
    }

    /// Observe one event in arrival order.
    ///
    /// An event anomalous on any sensor contributes to none of the windows.
    pub fn observe(&mut self, event: &Event) {
        if classify::classify(event).is_none() {
            self.temperature.push(event.temperature);
            self.humidity.push(event.humidity);
            self.pressure.push(event.pressure);
        }
        self.temperature.record_if_full();
        self.humidity.record_if_full();
        self.pressure.record_if_full();
    }

    /// The last full-window mean per sensor, `0.0` where the window never
    /// reached capacity.
    #[must_use]
    pub fn averages(&self) -> RegionAverages {
        RegionAverages {
            temperature_avg: self.temperature.last_full_mean.unwrap_or(0.0),
            humidity_avg: self.humidity.last_full_mean.unwrap_or(0.0),
            pressure_avg: self.pressure.last_full_mean.unwrap_or(0.0),
        }
    }

    /// Mergeable summary of the current window contents per sensor.
    #[must_use]
    pub fn stat(&self) -> RegionWindowStat {
        RegionWindowStat {
            temperature: self.temperature.stat(),
            humidity: self.humidity.stat(),
            pressure: self.pressure.stat(),
        }
    }
}

/// Published per-region metric values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionAverages {
    pub temperature_avg: f64,
    pub humidity_avg: f64,
    pub pressure_avg: f64,
}

/// Mergeable per-region window summary carried inside partial results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionWindowStat {
    pub temperature: WindowStat,
    pub humidity: WindowStat,
    pub pressure: WindowStat,
}

impl RegionWindowStat {
    pub fn merge(&mut self, other: &RegionWindowStat) {
        self.temperature.merge(other.temperature);
        self.humidity.merge(other.humidity);
        self.pressure.merge(other.pressure);
    }

    /// Finish the merged summary into published averages.
    ///
    /// A sensor whose merged sample count has not reached `window_size`
    /// reports `0.0`, matching the single-partition under-filled case.
    #[must_use]
    pub fn into_averages(self, window_size: usize) -> RegionAverages {
        let finish = |stat: WindowStat| {
            if (stat.count as usize) < window_size {
                0.0
            } else {
                stat.mean()
            }
        };
        RegionAverages {
            temperature_avg: finish(self.temperature),
            humidity_avg: finish(self.humidity),
            pressure_avg: finish(self.pressure),
        }
    }
}
