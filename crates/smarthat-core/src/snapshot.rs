//! Snapshot assembly: one refresh cycle, one immutable result.
//!
//! The aggregator owns the injected store handle and runs the whole pipeline
//! sequentially: read each source, normalize, classify the mixed stream,
//! derive distances and motion activity, assemble. No fault escapes a cycle:
//! a failed store initialization degrades every subsequent cycle to a
//! Disconnected, all-empty snapshot, and per-record problems are absorbed by
//! the fail-soft stages upstream.
//!
//! Each call to [`Aggregator::assemble`] produces a freshly-owned snapshot;
//! nothing carries across cycles and no locking is needed.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::classify::split_events;
use crate::derive::{annotate_distances, annotate_motion};
use crate::model::{
    BatterySample, DetectionEvent, EventRecord, HealthSample, LocationFix, MotionSample,
    RangeSample, StatsSample,
};
use crate::normalize::{
    normalize_battery, normalize_events, normalize_health, normalize_locations, normalize_motion,
    normalize_ultrasonic,
};
use crate::store::{SourceKind, StoreError, TelemetryStore, read_source};

/// Whether the backing store was reachable for this refresh cycle.
///
/// Disconnected means store initialization failed. A reachable store that
/// happens to hold no data is still Connected — empty is data, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// One refresh cycle's complete aggregated result.
///
/// Every slot is always present, possibly empty, so consumers branch on
/// emptiness and never on absence. Derived fields (`distance_meters`,
/// `motion_active`) are fully computed here; the rendering layer does no
/// further derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Store reachability for this cycle.
    pub connectivity: Connectivity,
    /// Capture instant, epoch milliseconds.
    pub collected_unix_ms: u64,
    /// System statistics partition of the mixed stream.
    pub system_stats: Vec<StatsSample>,
    /// Detection partition of the mixed stream.
    pub detections: Vec<DetectionEvent>,
    /// Mixed-stream records with an unrecognized or missing event type.
    pub other_events: Vec<EventRecord>,
    /// GPS trace with derived consecutive distances.
    pub locations: Vec<LocationFix>,
    /// Ultrasonic proximity readings.
    pub ultrasonic: Vec<RangeSample>,
    /// Battery level readings.
    pub battery: Vec<BatterySample>,
    /// Motion samples with derived activity flags.
    pub motion: Vec<MotionSample>,
    /// Component health reports.
    pub system_health: Vec<HealthSample>,
    /// Mixed-stream records dropped during normalization (bad timestamp key).
    pub skipped_events: usize,
}

/// Per-slot record counts, for operational summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotCounts {
    pub system_stats: usize,
    pub detections: usize,
    pub other_events: usize,
    pub locations: usize,
    pub ultrasonic: usize,
    pub battery: usize,
    pub motion: usize,
    pub system_health: usize,
}

impl SlotCounts {
    /// Total records across all slots.
    pub fn total(&self) -> usize {
        self.system_stats
            + self.detections
            + self.other_events
            + self.locations
            + self.ultrasonic
            + self.battery
            + self.motion
            + self.system_health
    }
}

impl Snapshot {
    /// All-empty snapshot for a cycle where the store was never reachable.
    pub fn disconnected() -> Self {
        Self {
            connectivity: Connectivity::Disconnected,
            collected_unix_ms: unix_ms_now(),
            system_stats: Vec::new(),
            detections: Vec::new(),
            other_events: Vec::new(),
            locations: Vec::new(),
            ultrasonic: Vec::new(),
            battery: Vec::new(),
            motion: Vec::new(),
            system_health: Vec::new(),
            skipped_events: 0,
        }
    }

    /// Per-slot record counts.
    pub fn counts(&self) -> SlotCounts {
        SlotCounts {
            system_stats: self.system_stats.len(),
            detections: self.detections.len(),
            other_events: self.other_events.len(),
            locations: self.locations.len(),
            ultrasonic: self.ultrasonic.len(),
            battery: self.battery.len(),
            motion: self.motion.len(),
            system_health: self.system_health.len(),
        }
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

fn unix_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Pull-based snapshot assembler over an injected store handle.
pub struct Aggregator {
    store: Option<Box<dyn TelemetryStore>>,
}

impl Aggregator {
    /// Build an aggregator from the outcome of store initialization. A
    /// failed initialization is remembered: every cycle then degrades to a
    /// Disconnected, all-empty snapshot instead of raising.
    pub fn new(store: Result<Box<dyn TelemetryStore>, StoreError>) -> Self {
        let store = match store {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("store initialization failed, snapshots will be disconnected: {e}");
                None
            }
        };
        Self { store }
    }

    /// Aggregator over an already-constructed store handle.
    pub fn with_store(store: Box<dyn TelemetryStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Whether the store handle was successfully initialized.
    pub fn connected(&self) -> bool {
        self.store.is_some()
    }

    /// Run one refresh cycle. Never fails; the worst outcome is a
    /// structurally complete snapshot with empty slots.
    pub fn assemble(&self) -> Snapshot {
        let Some(store) = self.store.as_deref() else {
            return Snapshot::disconnected();
        };

        let events = normalize_events(read_source(store, SourceKind::Events));
        if events.skipped > 0 {
            warn!("events: {} records dropped during normalization", events.skipped);
        }
        let parts = split_events(&events.kept);

        let mut locations = normalize_locations(read_source(store, SourceKind::Locations)).kept;
        annotate_distances(&mut locations);

        let ultrasonic = normalize_ultrasonic(read_source(store, SourceKind::Ultrasonic)).kept;
        let battery = normalize_battery(read_source(store, SourceKind::Battery)).kept;

        let mut motion = normalize_motion(read_source(store, SourceKind::Motion)).kept;
        annotate_motion(&mut motion);

        let system_health = normalize_health(read_source(store, SourceKind::SystemHealth)).kept;

        let snapshot = Snapshot {
            connectivity: Connectivity::Connected,
            collected_unix_ms: unix_ms_now(),
            system_stats: parts.system_stats,
            detections: parts.detections,
            other_events: parts.other,
            locations,
            ultrasonic,
            battery,
            motion,
            system_health,
            skipped_events: events.skipped,
        };
        debug!(
            "assembled snapshot: {} records across slots, {} skipped",
            snapshot.counts().total(),
            snapshot.skipped_events
        );
        snapshot
    }
}
