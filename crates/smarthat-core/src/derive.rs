//! Derived metrics: consecutive-fix distances and motion activity.
//!
//! Both derivations are per-source and self-contained: each takes exactly one
//! normalized sequence and annotates it in place. A malformed record never
//! aborts the pass — a hop touching an unusable coordinate contributes zero
//! meters and the rest of the trace is still computed.

use crate::geodesic;
use crate::model::{LocationFix, MOTION_ACTIVE_LABEL, MotionSample};

/// Usable coordinate pair: both components present, finite, and in range.
fn coordinates(fix: &LocationFix) -> Option<(f64, f64)> {
    let lat = fix.latitude?;
    let lon = fix.longitude?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return None;
    }
    Some((lat, lon))
}

/// Distance in meters from each fix to its predecessor, in trace order.
///
/// Same length as the input; `d[0]` is zero (no predecessor); every value is
/// non-negative. An empty trace short-circuits to an empty vec without
/// touching the distance function. Hops where either endpoint has no usable
/// coordinates contribute zero.
pub fn consecutive_distances(fixes: &[LocationFix]) -> Vec<f64> {
    if fixes.is_empty() {
        return Vec::new();
    }
    let mut distances = Vec::with_capacity(fixes.len());
    distances.push(0.0);
    for pair in fixes.windows(2) {
        let d = match (coordinates(&pair[0]), coordinates(&pair[1])) {
            (Some((lat1, lon1)), Some((lat2, lon2))) => {
                geodesic::distance_meters(lat1, lon1, lat2, lon2).max(0.0)
            }
            _ => 0.0,
        };
        distances.push(d);
    }
    distances
}

/// Write derived distances onto each fix of the trace.
pub fn annotate_distances(fixes: &mut [LocationFix]) {
    let distances = consecutive_distances(fixes);
    for (fix, d) in fixes.iter_mut().zip(distances) {
        fix.distance_meters = d;
    }
}

/// Map a categorical motion status onto the 0/1 activity flag. Only the
/// literal active label maps to 1; unrecognized and absent statuses map to 0.
pub fn motion_activity(status: Option<&str>) -> u8 {
    match status {
        Some(MOTION_ACTIVE_LABEL) => 1,
        _ => 0,
    }
}

/// Write the derived activity flag onto each motion sample.
pub fn annotate_motion(samples: &mut [MotionSample]) {
    for sample in samples {
        sample.motion_active = motion_activity(sample.motion_status.as_deref());
    }
}
