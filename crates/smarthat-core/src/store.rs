//! Backing store seam and per-source readers.
//!
//! The device uploads into two store shapes: a key-value time-series
//! collection for the mixed metrics/detections stream (key = epoch seconds as
//! text) and five plain document collections. [`TelemetryStore`] abstracts
//! both so the aggregator is handed an explicit connection handle instead of
//! reaching for process-global state.
//!
//! Readers never raise for a fetch-time fault: the source degrades to an
//! empty record set and the snapshot stays structurally complete. Total
//! store-initialization failure is the only condition reported upward, via
//! [`StoreError::Unreachable`] at construction time.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Value;

use crate::record::RawRecord;

/// Store-level failure. Fetch faults inside a refresh cycle are absorbed by
/// the readers; this error only escapes when the store handle itself cannot
/// be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or opened.
    Unreachable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(reason) => write!(f, "backing store unreachable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read-only handle on the telemetry backing store.
///
/// Implementations must be side-effect free on fetch: no caching, no retries.
/// The aggregator owns retry cadence through its refresh cycle.
pub trait TelemetryStore: Send + Sync {
    /// Fetch a key-value collection. Each entry's key is returned on the
    /// record; the events stream encodes its timestamp there.
    fn fetch_keyed(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// Fetch a plain document collection as an unordered set of flat
    /// documents.
    fn fetch_collection(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError>;
}

/// The six telemetry sources the device uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Mixed system-stats + detection events (key-value stream).
    Events,
    /// GPS fixes.
    Locations,
    /// Ultrasonic proximity readings.
    Ultrasonic,
    /// Battery level readings.
    Battery,
    /// Motion state samples.
    Motion,
    /// Component self-check reports.
    SystemHealth,
}

impl SourceKind {
    /// Every source, in assembly order.
    pub const ALL: [SourceKind; 6] = [
        Self::Events,
        Self::Locations,
        Self::Ultrasonic,
        Self::Battery,
        Self::Motion,
        Self::SystemHealth,
    ];

    /// Collection name in the backing store.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Events => "detections",
            Self::Locations => "location_logs",
            Self::Ultrasonic => "ultrasonic_logs",
            Self::Battery => "battery_logs",
            Self::Motion => "motion_logs",
            Self::SystemHealth => "system_health_logs",
        }
    }

    /// Whether the collection is key-value shaped (timestamp in the key).
    pub fn keyed(&self) -> bool {
        matches!(self, Self::Events)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events => write!(f, "events"),
            Self::Locations => write!(f, "locations"),
            Self::Ultrasonic => write!(f, "ultrasonic"),
            Self::Battery => write!(f, "battery"),
            Self::Motion => write!(f, "motion"),
            Self::SystemHealth => write!(f, "system_health"),
        }
    }
}

/// Fetch one source's raw records. A fetch-time fault is logged and degrades
/// to an empty set — the caller always receives a usable (possibly empty)
/// batch and the snapshot stays structurally complete.
pub fn read_source(store: &dyn TelemetryStore, kind: SourceKind) -> Vec<RawRecord> {
    let fetched = if kind.keyed() {
        store.fetch_keyed(kind.collection())
    } else {
        store.fetch_collection(kind.collection())
    };
    match fetched {
        Ok(records) => {
            debug!("source {kind}: fetched {} records", records.len());
            records
        }
        Err(e) => {
            warn!("source {kind}: fetch failed, treating as empty: {e}");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// JSON directory store
// ---------------------------------------------------------------------------

/// File-backed store: a directory with one `<collection>.json` per source.
///
/// Key-value collections are JSON objects (`{"<epoch>": {..fields..}, ...}`);
/// document collections are JSON arrays of objects. A missing file is an
/// empty source, not a fault. Keyed entries are returned in key order so
/// repeated reads of an unchanged directory are deterministic.
#[derive(Debug)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`. Fails with [`StoreError::Unreachable`]
    /// when the directory does not exist.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::Unreachable(format!(
                "no such directory: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    fn load(&self, collection: &str) -> Result<Option<Value>, StoreError> {
        let path = self.root.join(format!("{collection}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::Unreachable(format!("{}: {e}", path.display())))?;
        let value = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Unreachable(format!("{}: {e}", path.display())))?;
        Ok(Some(value))
    }
}

impl TelemetryStore for JsonDirStore {
    fn fetch_keyed(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        let Some(value) = self.load(collection)? else {
            return Ok(Vec::new());
        };
        let Value::Object(entries) = value else {
            return Err(StoreError::Unreachable(format!(
                "{collection}.json: expected a JSON object"
            )));
        };
        // serde_json::Map preserves insertion order; sort for stable reads.
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        let mut records = Vec::with_capacity(entries.len());
        for key in keys {
            match &entries[key.as_str()] {
                Value::Object(fields) => records.push(RawRecord::keyed(key.clone(), fields.clone())),
                other => {
                    warn!("{collection}.json: entry {key} is not an object ({other}), skipping");
                }
            }
        }
        Ok(records)
    }

    fn fetch_collection(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        let Some(value) = self.load(collection)? else {
            return Ok(Vec::new());
        };
        let Value::Array(docs) = value else {
            return Err(StoreError::Unreachable(format!(
                "{collection}.json: expected a JSON array"
            )));
        };
        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            match doc {
                Value::Object(fields) => records.push(RawRecord::document(fields)),
                other => warn!("{collection}.json: non-object document ({other}), skipping"),
            }
        }
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory store double, usable from tests and benches.
#[derive(Default)]
pub struct MemoryStore {
    keyed: HashMap<String, Vec<RawRecord>>,
    collections: HashMap<String, Vec<RawRecord>>,
    faulty: bool,
}

impl MemoryStore {
    /// Empty store where every collection exists and is empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every fetch fails, for exercising fetch-fault degradation.
    pub fn faulty() -> Self {
        Self {
            faulty: true,
            ..Self::default()
        }
    }

    /// Insert a key-value collection, kept in the order given.
    pub fn insert_keyed(&mut self, collection: &str, records: Vec<RawRecord>) {
        self.keyed.insert(collection.to_string(), records);
    }

    /// Insert a document collection, kept in the order given.
    pub fn insert_collection(&mut self, collection: &str, records: Vec<RawRecord>) {
        self.collections.insert(collection.to_string(), records);
    }
}

impl TelemetryStore for MemoryStore {
    fn fetch_keyed(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        if self.faulty {
            return Err(StoreError::Unreachable("simulated fetch fault".into()));
        }
        Ok(self.keyed.get(collection).cloned().unwrap_or_default())
    }

    fn fetch_collection(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        if self.faulty {
            return Err(StoreError::Unreachable("simulated fetch fault".into()));
        }
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // SourceKind tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_all_lists_six_sources() {
        assert_eq!(SourceKind::ALL.len(), 6);
    }

    #[test]
    fn test_only_events_is_keyed() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.keyed(), kind == SourceKind::Events);
        }
    }

    #[test]
    fn test_collection_names_are_distinct() {
        let mut names: Vec<&str> = SourceKind::ALL.iter().map(|k| k.collection()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    // -----------------------------------------------------------------------
    // read_source tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_read_source_empty_store() {
        let store = MemoryStore::new();
        assert!(read_source(&store, SourceKind::Battery).is_empty());
    }

    #[test]
    fn test_read_source_fetch_fault_degrades_to_empty() {
        let store = MemoryStore::faulty();
        for kind in SourceKind::ALL {
            assert!(read_source(&store, kind).is_empty());
        }
    }

    #[test]
    fn test_read_source_preserves_order() {
        let mut store = MemoryStore::new();
        let docs = vec![
            RawRecord::document(json!({"battery_percentage": 90}).as_object().unwrap().clone()),
            RawRecord::document(json!({"battery_percentage": 88}).as_object().unwrap().clone()),
        ];
        store.insert_collection("battery_logs", docs.clone());
        assert_eq!(read_source(&store, SourceKind::Battery), docs);
    }

    // -----------------------------------------------------------------------
    // JsonDirStore tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_open_missing_directory_is_unreachable() {
        let err = JsonDirStore::open("/definitely/not/a/dir").unwrap_err();
        assert!(matches!(err, StoreError::Unreachable(_)));
    }

    #[test]
    fn test_store_is_debug_formattable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        let rendered = format!("{store:?}");
        assert!(rendered.contains("JsonDirStore"));
    }

    #[test]
    fn test_missing_file_is_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert_eq!(store.fetch_collection("battery_logs").unwrap(), Vec::new());
        assert_eq!(store.fetch_keyed("detections").unwrap(), Vec::new());
    }

    #[test]
    fn test_fetch_keyed_returns_key_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("detections.json"),
            r#"{"1700000002": {"event_type": "detection"},
                "1700000001": {"event_type": "system_stats"}}"#,
        )
        .unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        let records = store.fetch_keyed("detections").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key.as_deref(), Some("1700000001"));
        assert_eq!(records[1].key.as_deref(), Some("1700000002"));
    }

    #[test]
    fn test_fetch_collection_reads_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("location_logs.json"),
            r#"[{"latitude": 1.0, "longitude": 2.0, "timestamp": "t0"}]"#,
        )
        .unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        let records = store.fetch_collection("location_logs").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number("latitude"), Some(1.0));
    }

    #[test]
    fn test_fetch_wrong_shape_is_fault() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("battery_logs.json"), r#"{"not": "an array"}"#).unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert!(store.fetch_collection("battery_logs").is_err());
    }

    #[test]
    fn test_fetch_invalid_json_is_fault_but_reader_degrades() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("motion_logs.json"), "{oops").unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert!(store.fetch_collection("motion_logs").is_err());
        assert!(read_source(&store, SourceKind::Motion).is_empty());
    }
}
