//! Multi-sensor anomaly period detection.
//!
//! A "period" is a trailing time window in which one station shows anomalies
//! on more than one distinct sensor kind. The detector keeps a FIFO queue of
//! `(timestamp, sensor)` pairs for anomalous readings only; once two distinct
//! kinds coexist inside the window the counter increments and the queue is
//! cleared, so one overlap is not counted again by every following reading.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

use crate::classify;
use crate::event::{Event, Sensor};

/// Trailing-window detector for concurrent distinct-sensor anomalies.
///
/// Readings must be observed in non-decreasing timestamp order.
#[derive(Clone, Debug)]
pub struct PeriodDetector {
    window: Duration,
    queue: VecDeque<(DateTime<Utc>, Sensor)>,
    periods: u64,
}

impl PeriodDetector {
    #[must_use]
    pub fn new(window_minutes: i64) -> Self {
        Self {
            window: Duration::minutes(window_minutes),
            queue: VecDeque::new(),
            periods: 0,
        }
    }

    /// Record one anomalous reading.
    pub fn observe(&mut self, timestamp: DateTime<Utc>, sensor: Sensor) {
        debug_assert!(
            self.queue.back().is_none_or(|&(back, _)| timestamp >= back),
            "readings must arrive in non-decreasing timestamp order"
        );
        while let Some(&(front, _)) = self.queue.front() {
            if timestamp - front > self.window {
                self.queue.pop_front();
            } else {
                break;
            }
        }
        self.queue.push_back((timestamp, sensor));

        let first = self.queue[0].1;
        if self.queue.iter().any(|&(_, s)| s != first) {
            self.periods += 1;
            self.queue.clear();
        }
    }

    /// Number of periods detected so far.
    #[must_use]
    pub fn periods(&self) -> u64 {
        self.periods
    }
}

/// Count multi-sensor anomaly periods over a station's time-ordered events.
///
/// Non-anomalous events never touch the detector queue.
#[must_use]
pub fn count_multi_sensor_periods(events: &[Event], window_minutes: i64) -> u64 {
    let mut detector = PeriodDetector::new(window_minutes);
    for event in events {
        if let Some(sensor) = classify::classify(event) {
            detector.observe(event.timestamp, sensor);
        }
    }
    detector.periods()
}
