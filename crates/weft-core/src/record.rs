//! Raw content records.
//!
//! A [`RawRecord`] is what the content layer hands the graph engine: an
//! identifier plus an opaque JSON data bag. The engine never validates the
//! bag (records are assumed schema-valid upstream); it only inspects fields
//! for reference shapes and the `order` hint used by query sorting.
//!
//! # Identifier rule
//!
//! A record's identifier is its `slug` field when present and non-empty,
//! otherwise its `id` field. Sources that know an external identifier (a
//! file stem, a database key) fall back to it when the bag carries neither.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::{EntryKey, normalize_id};

/// One content record: a normalized identifier and its data bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Normalized identifier within the owning collection.
    pub id: String,
    /// Opaque record data. Field order is preserved as declared.
    pub data: Value,
}

impl RawRecord {
    /// Create a record with an explicit identifier (normalized).
    #[must_use]
    pub fn new(id: impl AsRef<str>, data: Value) -> Self {
        Self {
            id: normalize_id(id.as_ref()).to_string(),
            data,
        }
    }

    /// Extract the identifier a data bag carries, if any.
    ///
    /// Prefers `slug` over `id`; both must be non-empty strings after
    /// trimming.
    #[must_use]
    pub fn identifier_of(data: &Value) -> Option<String> {
        for field in ["slug", "id"] {
            if let Some(raw) = data.get(field).and_then(Value::as_str) {
                let id = normalize_id(raw);
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
        None
    }

    /// Build a record from a bare data bag, taking the identifier from the
    /// bag itself. Returns `None` when the bag carries neither `slug` nor
    /// `id`.
    #[must_use]
    pub fn from_value(data: Value) -> Option<Self> {
        let id = Self::identifier_of(&data)?;
        Some(Self { id, data })
    }

    /// The record's key within `collection`.
    #[must_use]
    pub fn key(&self, collection: &str) -> EntryKey {
        EntryKey::new(collection, &self.id)
    }

    /// Access a field of the data bag.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// The numeric `order` hint, when present.
    ///
    /// Used by query helpers to sort siblings; records without one sort
    /// after records with one.
    #[must_use]
    pub fn order(&self) -> Option<f64> {
        self.data.get("order").and_then(Value::as_f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
