use stratus::Sensor;
use stratus::periods::{PeriodDetector, count_multi_sensor_periods};
use stratus::testing::{EventBuilder, base_time};

use chrono::Duration;

#[test]
fn distinct_sensors_within_the_window_count_once() {
    let events = vec![
        EventBuilder::new(3, "north")
            .at_minutes(0)
            .temperature(50.0)
            .build(),
        EventBuilder::new(3, "north")
            .at_minutes(2)
            .humidity(120.0)
            .build(),
        // A third anomaly right after the overlap must not open a second
        // period: the queue was cleared on detection.
        EventBuilder::new(3, "north")
            .at_minutes(3)
            .temperature(50.0)
            .build(),
    ];
    assert_eq!(count_multi_sensor_periods(&events, 10), 1);
}

#[test]
fn a_single_sensor_never_counts() {
    let events: Vec<_> = (0..6)
        .map(|minute| {
            EventBuilder::new(1, "north")
                .at_minutes(minute)
                .temperature(50.0)
                .build()
        })
        .collect();
    assert_eq!(count_multi_sensor_periods(&events, 10), 0);
}

#[test]
fn anomalies_outside_the_window_do_not_pair() {
    let events = vec![
        EventBuilder::new(1, "north")
            .at_minutes(0)
            .temperature(50.0)
            .build(),
        EventBuilder::new(1, "north")
            .at_minutes(11)
            .humidity(120.0)
            .build(),
    ];
    assert_eq!(count_multi_sensor_periods(&events, 10), 0);
}

#[test]
fn a_gap_of_exactly_the_window_still_pairs() {
    let events = vec![
        EventBuilder::new(1, "north")
            .at_minutes(0)
            .temperature(50.0)
            .build(),
        EventBuilder::new(1, "north")
            .at_minutes(10)
            .humidity(120.0)
            .build(),
    ];
    assert_eq!(count_multi_sensor_periods(&events, 10), 1);
}

#[test]
fn clean_events_do_not_touch_the_queue() {
    let mut events = vec![
        EventBuilder::new(1, "north")
            .at_minutes(0)
            .temperature(50.0)
            .build(),
    ];
    for minute in 1..9 {
        events.push(EventBuilder::new(1, "north").at_minutes(minute).build());
    }
    events.push(
        EventBuilder::new(1, "north")
            .at_minutes(9)
            .humidity(120.0)
            .build(),
    );
    assert_eq!(count_multi_sensor_periods(&events, 10), 1);
}

#[test]
fn a_new_overlap_after_detection_counts_again() {
    let events = vec![
        EventBuilder::new(1, "north")
            .at_minutes(0)
            .temperature(50.0)
            .build(),
        EventBuilder::new(1, "north")
            .at_minutes(1)
            .humidity(120.0)
            .build(),
        EventBuilder::new(1, "north")
            .at_minutes(2)
            .temperature(50.0)
            .build(),
        EventBuilder::new(1, "north")
            .at_minutes(3)
            .pressure(900.0)
            .build(),
    ];
    assert_eq!(count_multi_sensor_periods(&events, 10), 2);
}

#[test]
fn detector_count_is_monotonically_non_decreasing() {
    let mut detector = PeriodDetector::new(10);
    let mut previous = 0;
    let sensors = [
        Sensor::Temperature,
        Sensor::Humidity,
        Sensor::Temperature,
        Sensor::Pressure,
        Sensor::Humidity,
        Sensor::Humidity,
    ];
    for (i, sensor) in sensors.into_iter().enumerate() {
        detector.observe(base_time() + Duration::minutes(i as i64), sensor);
        assert!(detector.periods() >= previous);
        previous = detector.periods();
    }
    assert!(previous > 0);
}
