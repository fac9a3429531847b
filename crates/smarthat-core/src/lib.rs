//! # smarthat-core
//!
//! Telemetry aggregation and derived-metrics engine for the Smart Hat
//! assistive wearable.
//!
//! The device uploads six independently-timestamped telemetry streams —
//! mixed system-stats/detection events, GPS fixes, ultrasonic proximity,
//! battery level, motion state, and component health. This crate pulls the
//! raw record sets, normalizes them onto a common time axis, splits the
//! mixed stream by event type, derives consecutive-fix geodesic distances
//! and motion activity flags, and assembles everything into one
//! refresh-consistent [`Snapshot`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use smarthat_core::{Aggregator, JsonDirStore, TelemetryStore};
//!
//! let store = JsonDirStore::open("/var/lib/smarthat/data")
//!     .map(|s| Box::new(s) as Box<dyn TelemetryStore>);
//! let aggregator = Aggregator::new(store);
//!
//! // One refresh cycle. Never fails: a dead store yields a Disconnected,
//! // all-empty snapshot instead of an error.
//! let snapshot = aggregator.assemble();
//! println!("{} location fixes", snapshot.locations.len());
//! ```
//!
//! ## Architecture
//!
//! Source Readers → Normalizer → Classifier (mixed stream) →
//! Derived Metrics (locations, motion) → Snapshot Assembler
//!
//! Failure degrades, never propagates: a malformed record is skipped, a
//! faulted fetch empties its slot, and only a failed store initialization
//! flips the snapshot's [`Connectivity`] to Disconnected. Downstream
//! consumers branch on emptiness and the connectivity flag — never on
//! absent slots, and never on errors.

pub mod classify;
pub mod derive;
pub mod geodesic;
pub mod model;
pub mod normalize;
pub mod record;
pub mod snapshot;
pub mod store;

pub use classify::{EventPartitions, classify, split_events};
pub use derive::{annotate_distances, annotate_motion, consecutive_distances, motion_activity};
pub use geodesic::distance_meters;
pub use model::{
    BatterySample, DetectionEvent, EVENT_TYPE_DETECTION, EVENT_TYPE_SYSTEM_STATS, EventRecord,
    HealthSample, LocationFix, MOTION_ACTIVE_LABEL, MotionSample, RangeSample, StatsSample,
};
pub use normalize::{
    normalize_battery, normalize_events, normalize_health, normalize_locations, normalize_motion,
    normalize_ultrasonic,
};
pub use record::{PartialBatch, RawRecord};
pub use snapshot::{Aggregator, Connectivity, SlotCounts, Snapshot};
pub use store::{JsonDirStore, MemoryStore, SourceKind, StoreError, TelemetryStore, read_source};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
