pub mod serve;
pub mod snapshot;
pub mod sources;
pub mod watch;

use smarthat_core::{Aggregator, JsonDirStore, Snapshot, TelemetryStore};

/// Build an aggregator over a JSON directory store. A missing or unreadable
/// directory is not fatal: the aggregator degrades to disconnected
/// snapshots, same as the engine does against a dead backing store.
pub fn make_aggregator(store_path: &str) -> Aggregator {
    let store = JsonDirStore::open(store_path).map(|s| Box::new(s) as Box<dyn TelemetryStore>);
    Aggregator::new(store)
}

/// Print a one-screen summary of a snapshot: connectivity plus per-slot
/// record counts.
pub fn print_summary(snapshot: &Snapshot) {
    let counts = snapshot.counts();
    println!("Connectivity: {}", snapshot.connectivity);
    println!("Captured:     {} (unix ms)", snapshot.collected_unix_ms);
    println!();
    println!("{:<16} {:>8}", "Slot", "Records");
    println!("{}", "-".repeat(25));
    println!("{:<16} {:>8}", "system_stats", counts.system_stats);
    println!("{:<16} {:>8}", "detections", counts.detections);
    println!("{:<16} {:>8}", "other_events", counts.other_events);
    println!("{:<16} {:>8}", "locations", counts.locations);
    println!("{:<16} {:>8}", "ultrasonic", counts.ultrasonic);
    println!("{:<16} {:>8}", "battery", counts.battery);
    println!("{:<16} {:>8}", "motion", counts.motion);
    println!("{:<16} {:>8}", "system_health", counts.system_health);
    println!("{}", "-".repeat(25));
    println!("{:<16} {:>8}", "total", counts.total());
    if snapshot.skipped_events > 0 {
        println!("\n{} event record(s) dropped during normalization", snapshot.skipped_events);
    }
    if let Some(last) = snapshot.locations.last() {
        let walked: f64 = snapshot.locations.iter().map(|f| f.distance_meters).sum();
        println!("\nTrace: {:.1} m total, last hop {:.1} m", walked, last.distance_meters);
    }
}

/// Print the full snapshot as JSON.
pub fn print_json(snapshot: &Snapshot) {
    match serde_json::to_string_pretty(snapshot) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("failed to serialize snapshot: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthat_core::Connectivity;

    #[test]
    fn test_make_aggregator_missing_dir_degrades() {
        let agg = make_aggregator("/definitely/not/a/dir");
        assert!(!agg.connected());
        assert_eq!(agg.assemble().connectivity, Connectivity::Disconnected);
    }
}
