//! Record normalization: raw store documents into typed records.
//!
//! The mixed events stream stores its timestamp as the entry key, an epoch
//! value in seconds rendered as text (fractional seconds allowed). That key
//! is the only field this stage parses; the document collections carry a
//! preformatted `timestamp` field which is passed through verbatim.
//!
//! Policy: fail soft per record, never per source. One unparsable key drops
//! that record and counts it in [`PartialBatch::skipped`]; the rest of the
//! batch goes through.

use log::warn;

use crate::model::{
    BatterySample, EventRecord, HealthSample, LocationFix, MotionSample, RangeSample,
};
use crate::record::{PartialBatch, RawRecord};

/// Parse an epoch-seconds text key into epoch milliseconds.
fn parse_epoch_key(key: &str) -> Option<i64> {
    let secs: f64 = key.trim().parse().ok()?;
    if !secs.is_finite() {
        return None;
    }
    Some((secs * 1000.0).round() as i64)
}

/// Normalize the mixed metrics/detections stream. The record key must be an
/// epoch-seconds value; records with a missing or unparsable key are dropped
/// and counted.
pub fn normalize_events(raw: Vec<RawRecord>) -> PartialBatch<EventRecord> {
    let mut batch = PartialBatch::default();
    for record in raw {
        let Some(timestamp_ms) = record.key.as_deref().and_then(parse_epoch_key) else {
            warn!(
                "events: dropping record with unparsable timestamp key {:?}",
                record.key
            );
            batch.skipped += 1;
            continue;
        };
        let event_type = record.text("event_type");
        let mut fields = record.fields;
        fields.remove("event_type");
        batch.kept.push(EventRecord {
            timestamp_ms,
            event_type,
            fields,
        });
    }
    batch
}

/// Normalize GPS fixes. `distance_meters` starts at zero and is filled in by
/// the derivation stage.
pub fn normalize_locations(raw: Vec<RawRecord>) -> PartialBatch<LocationFix> {
    PartialBatch::complete(
        raw.iter()
            .map(|r| LocationFix {
                timestamp: r.text("timestamp"),
                latitude: r.number("latitude"),
                longitude: r.number("longitude"),
                speed: r.number("speed"),
                distance_meters: 0.0,
            })
            .collect(),
    )
}

/// Normalize ultrasonic proximity readings.
pub fn normalize_ultrasonic(raw: Vec<RawRecord>) -> PartialBatch<RangeSample> {
    PartialBatch::complete(
        raw.iter()
            .map(|r| RangeSample {
                timestamp: r.text("timestamp"),
                distance_cm: r.number("distance_cm"),
            })
            .collect(),
    )
}

/// Normalize battery level readings.
pub fn normalize_battery(raw: Vec<RawRecord>) -> PartialBatch<BatterySample> {
    PartialBatch::complete(
        raw.iter()
            .map(|r| BatterySample {
                timestamp: r.text("timestamp"),
                battery_percentage: r.number("battery_percentage"),
            })
            .collect(),
    )
}

/// Normalize motion state samples. `motion_active` starts at zero and is
/// filled in by the derivation stage.
pub fn normalize_motion(raw: Vec<RawRecord>) -> PartialBatch<MotionSample> {
    PartialBatch::complete(
        raw.iter()
            .map(|r| MotionSample {
                timestamp: r.text("timestamp"),
                motion_status: r.text("motion_status"),
                motion_active: 0,
            })
            .collect(),
    )
}

/// Normalize component health reports.
pub fn normalize_health(raw: Vec<RawRecord>) -> PartialBatch<HealthSample> {
    PartialBatch::complete(
        raw.iter()
            .map(|r| HealthSample {
                timestamp: r.text("timestamp"),
                sensor_name: r.text("sensor_name"),
                sensor_faults: r.text("sensor_faults"),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn keyed(key: &str, body: Value) -> RawRecord {
        RawRecord::keyed(key, body.as_object().unwrap().clone())
    }

    fn doc(body: Value) -> RawRecord {
        RawRecord::document(body.as_object().unwrap().clone())
    }

    // -----------------------------------------------------------------------
    // Event normalization tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_epoch_key_parsed_to_millis() {
        let batch = normalize_events(vec![keyed(
            "1700000000.5",
            json!({"event_type": "system_stats", "CPU": 12.0}),
        )]);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.kept.len(), 1);
        assert_eq!(batch.kept[0].timestamp_ms, 1_700_000_000_500);
        assert_eq!(batch.kept[0].event_type.as_deref(), Some("system_stats"));
    }

    #[test]
    fn test_discriminator_removed_from_body() {
        let batch = normalize_events(vec![keyed(
            "1700000000",
            json!({"event_type": "detection", "label": "person"}),
        )]);
        assert!(!batch.kept[0].fields.contains_key("event_type"));
        assert!(batch.kept[0].fields.contains_key("label"));
    }

    #[test]
    fn test_bad_key_dropped_rest_kept() {
        let batch = normalize_events(vec![
            keyed("1700000001", json!({"event_type": "system_stats"})),
            keyed("not-a-timestamp", json!({"event_type": "system_stats"})),
            keyed("1700000002", json!({"event_type": "detection"})),
        ]);
        assert_eq!(batch.kept.len(), 2);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.kept[0].timestamp_ms, 1_700_000_001_000);
        assert_eq!(batch.kept[1].timestamp_ms, 1_700_000_002_000);
    }

    #[test]
    fn test_missing_key_dropped() {
        let batch = normalize_events(vec![doc(json!({"event_type": "detection"}))]);
        assert!(batch.kept.is_empty());
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_non_finite_key_dropped() {
        let batch = normalize_events(vec![keyed("inf", json!({}))]);
        assert!(batch.kept.is_empty());
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_untagged_event_kept_without_type() {
        let batch = normalize_events(vec![keyed("1700000000", json!({"CPU": 3.0}))]);
        assert_eq!(batch.kept[0].event_type, None);
    }

    // -----------------------------------------------------------------------
    // Document collection tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_location_timestamp_passed_through_verbatim() {
        let batch = normalize_locations(vec![doc(json!({
            "timestamp": "2024-11-14 09:30:00",
            "latitude": 14.5995,
            "longitude": 120.9842,
        }))]);
        let fix = &batch.kept[0];
        assert_eq!(fix.timestamp.as_deref(), Some("2024-11-14 09:30:00"));
        assert_eq!(fix.latitude, Some(14.5995));
        assert_eq!(fix.speed, None);
        assert_eq!(fix.distance_meters, 0.0);
    }

    #[test]
    fn test_partial_location_kept_not_dropped() {
        let batch = normalize_locations(vec![doc(json!({"latitude": 1.0}))]);
        assert_eq!(batch.kept.len(), 1);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.kept[0].longitude, None);
    }

    #[test]
    fn test_battery_absent_reading_stays_absent() {
        let batch = normalize_battery(vec![doc(json!({"timestamp": "t"}))]);
        assert_eq!(batch.kept[0].battery_percentage, None);
    }

    #[test]
    fn test_motion_active_defaults_to_zero_before_derivation() {
        let batch = normalize_motion(vec![doc(json!({"motion_status": "active"}))]);
        assert_eq!(batch.kept[0].motion_active, 0);
    }

    #[test]
    fn test_health_numeric_fault_code_rendered_to_text() {
        let batch = normalize_health(vec![doc(json!({
            "sensor_name": "ultrasonic",
            "sensor_faults": 2,
        }))]);
        assert_eq!(batch.kept[0].sensor_faults.as_deref(), Some("2"));
    }

    #[test]
    fn test_empty_input_yields_empty_batch() {
        assert!(normalize_events(Vec::new()).kept.is_empty());
        assert!(normalize_locations(Vec::new()).kept.is_empty());
        assert!(normalize_ultrasonic(Vec::new()).kept.is_empty());
    }
}
