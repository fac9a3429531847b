//! Event classification: splitting the mixed stream by discriminator.
//!
//! The device logs system statistics and object detections into one physical
//! stream, tagged by `event_type`. Classification is a pure,
//! order-preserving filter; [`split_events`] partitions one pass of the
//! stream into disjoint sub-streams whose union is the input.

use crate::model::{
    DetectionEvent, EVENT_TYPE_DETECTION, EVENT_TYPE_SYSTEM_STATS, EventRecord, StatsSample,
};

/// Disjoint partitions of one mixed event stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPartitions {
    /// `event_type == "system_stats"`, projected into typed samples.
    pub system_stats: Vec<StatsSample>,
    /// `event_type == "detection"`, projected into typed events.
    pub detections: Vec<DetectionEvent>,
    /// Everything else (unknown or missing event type), passed through.
    pub other: Vec<EventRecord>,
}

/// Order-preserving filter: the subsequence whose `event_type` equals
/// `value`. Empty input yields empty output.
pub fn classify<'a>(events: &'a [EventRecord], value: &str) -> Vec<&'a EventRecord> {
    events
        .iter()
        .filter(|e| e.event_type.as_deref() == Some(value))
        .collect()
}

/// Partition a mixed stream into stats, detections, and unclassified
/// leftovers. Relative order inside each partition matches the input; every
/// input record lands in exactly one partition.
pub fn split_events(events: &[EventRecord]) -> EventPartitions {
    let mut parts = EventPartitions::default();
    for event in events {
        match event.event_type.as_deref() {
            Some(EVENT_TYPE_SYSTEM_STATS) => parts.system_stats.push(event.to_stats()),
            Some(EVENT_TYPE_DETECTION) => parts.detections.push(event.to_detection()),
            _ => parts.other.push(event.clone()),
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn event(ts: i64, event_type: Option<&str>) -> EventRecord {
        EventRecord {
            timestamp_ms: ts,
            event_type: event_type.map(str::to_string),
            fields: Map::new(),
        }
    }

    fn mixed_stream() -> Vec<EventRecord> {
        vec![
            event(1, Some("system_stats")),
            event(2, Some("detection")),
            event(3, Some("system_stats")),
            event(4, Some("gps_fix")),
            event(5, Some("detection")),
            event(6, None),
        ]
    }

    // -----------------------------------------------------------------------
    // classify tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_classify_filters_by_discriminator() {
        let events = mixed_stream();
        let stats = classify(&events, "system_stats");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].timestamp_ms, 1);
        assert_eq!(stats[1].timestamp_ms, 3);
    }

    #[test]
    fn test_classify_preserves_relative_order() {
        let events = mixed_stream();
        let detections = classify(&events, "detection");
        let timestamps: Vec<i64> = detections.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(timestamps, vec![2, 5]);
    }

    #[test]
    fn test_classify_empty_input() {
        assert!(classify(&[], "system_stats").is_empty());
    }

    #[test]
    fn test_classify_no_match() {
        let events = mixed_stream();
        assert!(classify(&events, "battery").is_empty());
    }

    // -----------------------------------------------------------------------
    // split_events tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_split_partition_sizes() {
        let parts = split_events(&mixed_stream());
        assert_eq!(parts.system_stats.len(), 2);
        assert_eq!(parts.detections.len(), 2);
        assert_eq!(parts.other.len(), 2);
    }

    #[test]
    fn test_split_partitions_cover_input() {
        let events = mixed_stream();
        let parts = split_events(&events);
        let total = parts.system_stats.len() + parts.detections.len() + parts.other.len();
        assert_eq!(total, events.len());
    }

    #[test]
    fn test_split_partitions_are_disjoint_and_reconstruct() {
        let events = mixed_stream();
        let parts = split_events(&events);
        // Merge the partitions back by timestamp; the mixed_stream fixture
        // has strictly increasing timestamps, so an order-preserving
        // interleave is exactly a sort by timestamp.
        let mut merged: Vec<i64> = parts
            .system_stats
            .iter()
            .map(|s| s.timestamp_ms)
            .chain(parts.detections.iter().map(|d| d.timestamp_ms))
            .chain(parts.other.iter().map(|o| o.timestamp_ms))
            .collect();
        merged.sort_unstable();
        let original: Vec<i64> = events.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(merged, original);
    }

    #[test]
    fn test_split_unknown_types_pass_through() {
        let parts = split_events(&mixed_stream());
        assert_eq!(parts.other[0].event_type.as_deref(), Some("gps_fix"));
        assert_eq!(parts.other[1].event_type, None);
    }

    #[test]
    fn test_split_empty_stream() {
        let parts = split_events(&[]);
        assert_eq!(parts, EventPartitions::default());
    }

    #[test]
    fn test_split_projects_stats_fields() {
        let mut e = event(10, Some("system_stats"));
        e.fields = json!({"CPU": 77.0}).as_object().unwrap().clone();
        let parts = split_events(&[e]);
        assert_eq!(parts.system_stats[0].cpu, Some(77.0));
    }
}
