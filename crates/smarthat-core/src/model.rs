//! Normalized, typed telemetry records.
//!
//! One struct per source, every store-provided field optional: the device
//! logs best-effort and a missing field must stay representable as missing,
//! never defaulted to zero. Derived fields (`distance_meters`,
//! `motion_active`) are filled in by the derivation stage after
//! normalization.
//!
//! The mixed events stream keeps its timestamp as epoch milliseconds because
//! the store encodes it as an epoch-seconds key; the document collections log
//! a preformatted `timestamp` field which is passed through verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminator value for system statistics events.
pub const EVENT_TYPE_SYSTEM_STATS: &str = "system_stats";
/// Discriminator value for object detection events.
pub const EVENT_TYPE_DETECTION: &str = "detection";
/// Motion status label that counts as active.
pub const MOTION_ACTIVE_LABEL: &str = "active";

/// One normalized record from the mixed metrics/detections stream, prior to
/// classification. `event_type` drives the classifier; the remaining body is
/// kept as-is so unrecognized event types pass through unclassified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Epoch milliseconds parsed from the store key.
    pub timestamp_ms: i64,
    /// Event-type discriminator, absent when the device did not tag the event.
    pub event_type: Option<String>,
    /// Remaining event body (discriminator excluded).
    pub fields: Map<String, Value>,
}

/// Device system statistics sample (`event_type == "system_stats"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSample {
    pub timestamp_ms: i64,
    /// CPU usage percent.
    pub cpu: Option<f64>,
    /// Memory usage percent.
    pub mem: Option<f64>,
    /// Core temperature in °C.
    pub temp: Option<f64>,
}

/// Object detection event (`event_type == "detection"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub timestamp_ms: i64,
    /// Detected object class label.
    pub label: Option<String>,
    /// Detector confidence score.
    pub confidence: Option<f64>,
    /// Estimated distance to the detected object in centimeters.
    pub estimated_distance_cm: Option<f64>,
}

/// One GPS fix. `distance_meters` is derived: geodesic meters from the
/// previous fix in the trace, zero for the first fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub timestamp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Reported ground speed, unit as logged by the device.
    pub speed: Option<f64>,
    /// Derived: geodesic distance from the preceding fix, in meters.
    pub distance_meters: f64,
}

/// Ultrasonic proximity reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSample {
    pub timestamp: Option<String>,
    pub distance_cm: Option<f64>,
}

/// Battery level reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySample {
    pub timestamp: Option<String>,
    pub battery_percentage: Option<f64>,
}

/// Motion state sample. `motion_active` is derived from `motion_status`:
/// 1 iff the status equals [`MOTION_ACTIVE_LABEL`], 0 for everything else
/// including absent and unrecognized labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp: Option<String>,
    pub motion_status: Option<String>,
    /// Derived 0/1 activity flag.
    pub motion_active: u8,
}

/// Component health report from the device's self-checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub timestamp: Option<String>,
    pub sensor_name: Option<String>,
    pub sensor_faults: Option<String>,
}

impl EventRecord {
    /// Project into a stats sample. Field names are the device's own
    /// (`CPU`/`MEM`/`TEMP`); anything missing stays `None`.
    pub fn to_stats(&self) -> StatsSample {
        StatsSample {
            timestamp_ms: self.timestamp_ms,
            cpu: self.num_field("CPU"),
            mem: self.num_field("MEM"),
            temp: self.num_field("TEMP"),
        }
    }

    /// Project into a detection event.
    pub fn to_detection(&self) -> DetectionEvent {
        DetectionEvent {
            timestamp_ms: self.timestamp_ms,
            label: self.text_field("label"),
            confidence: self.num_field("confidence"),
            estimated_distance_cm: self.num_field("estimated_distance_cm"),
        }
    }

    fn num_field(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn text_field(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
