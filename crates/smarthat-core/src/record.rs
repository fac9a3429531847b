//! Raw store records and the fail-soft batch result.
//!
//! A [`RawRecord`] is what a source reader hands to the normalizer: the flat
//! document body as returned by the backing store, plus the store key when the
//! collection is key-value shaped (the mixed events stream encodes its
//! timestamp in the key). Raw records are never mutated after creation; the
//! normalizer consumes them and emits typed records.

use serde_json::{Map, Value};

/// One raw document fetched from the backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Store key for key-value collections (epoch-as-text for the events
    /// stream). `None` for plain document collections.
    pub key: Option<String>,
    /// Flat field map as the store returned it.
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// Raw record from a plain document body.
    pub fn document(fields: Map<String, Value>) -> Self {
        Self { key: None, fields }
    }

    /// Raw record from a key-value entry.
    pub fn keyed(key: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            key: Some(key.into()),
            fields,
        }
    }

    /// Read a numeric field, accepting both JSON numbers and numeric text.
    /// Returns `None` when the field is absent or not numeric — absence stays
    /// distinguishable from a true zero reading.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Read a textual field. Numbers and booleans are rendered to text so
    /// loosely-typed store documents (e.g. fault codes logged as integers)
    /// still come through.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Result of a fail-soft per-record stage.
///
/// Normalization never aborts a whole batch on one malformed record: the
/// well-formed majority is kept and the drop count is reported so the policy
/// is observable rather than silent.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialBatch<T> {
    /// Records that survived the stage, source order preserved.
    pub kept: Vec<T>,
    /// Number of records dropped by the stage.
    pub skipped: usize,
}

impl<T> PartialBatch<T> {
    /// A batch where nothing was dropped.
    pub fn complete(kept: Vec<T>) -> Self {
        Self { kept, skipped: 0 }
    }
}

impl<T> Default for PartialBatch<T> {
    fn default() -> Self {
        Self {
            kept: Vec::new(),
            skipped: 0,
        }
    }
}
