//! Reference classification and normalization.
//!
//! Record data represents relations in three interchangeable shapes:
//!
//! - a scalar id — bare (`"serviceB"`, resolved into the owning collection)
//!   or qualified (`"authors/jane"`);
//! - an embedded object carrying `id` (or `slug`) and optionally
//!   `collection`;
//! - a sequence of any mix of the above.
//!
//! [`normalize_reference`] flattens all of them into an ordered, deduplicated
//! list of [`EntryKey`]s. Values of any other shape are rejected with
//! [`InvalidShape`] — the caller skips the field and records a warning, it
//! is never fatal.
//!
//! # Field discovery
//!
//! Relation fields are not declared anywhere; [`extract_relation_fields`]
//! discovers them by inspecting which fields hold reference-shaped values,
//! in field declaration order. Discovery is stricter than normalization:
//! a bare string is indistinguishable from prose, so only qualified scalars,
//! id-bearing objects, and non-empty sequences of those count. The reserved
//! hierarchy field (`parent`) is handled by name instead and accepts bare
//! scalars.

use serde_json::Value;
use std::collections::HashSet;

use crate::key::{EntryKey, normalize_id};

/// The reserved hierarchy field name.
pub const PARENT_FIELD: &str = "parent";

/// Return `true` if `name` is the reserved hierarchy field.
#[must_use]
pub fn is_parent_field(name: &str) -> bool {
    name == PARENT_FIELD
}

/// Error for a relation field whose value is neither scalar, object, nor a
/// sequence of either.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value is not reference-shaped: expected a scalar id, an object with an id, or a sequence of either")]
pub struct InvalidShape;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one reference value into a flat ordered list of keys.
///
/// `own_collection` resolves bare scalar ids (and embedded objects without a
/// `collection` member). Exact repeats are dropped, preserving first-seen
/// order. `null` normalizes to the empty list.
///
/// # Errors
///
/// Returns [`InvalidShape`] when the value (or any sequence element) is not
/// one of the accepted shapes.
pub fn normalize_reference(
    value: &Value,
    own_collection: &str,
) -> Result<Vec<EntryKey>, InvalidShape> {
    let mut out: Vec<EntryKey> = Vec::new();
    let mut seen: HashSet<EntryKey> = HashSet::new();

    let mut push = |key: EntryKey| {
        if !key.is_empty() && seen.insert(key.clone()) {
            out.push(key);
        }
    };

    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                if let Some(key) = single_reference(item, own_collection)? {
                    push(key);
                }
            }
        }
        other => {
            if let Some(key) = single_reference(other, own_collection)? {
                push(key);
            }
        }
    }

    Ok(out)
}

/// Normalize one non-sequence reference value.
///
/// `Ok(None)` means "no reference here" (null, blank string) — distinct from
/// a shape error.
fn single_reference(value: &Value, own_collection: &str) -> Result<Option<EntryKey>, InvalidShape> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(scalar_reference(s, own_collection)),
        Value::Number(n) => Ok(Some(EntryKey::new(own_collection, n.to_string()))),
        Value::Object(obj) => {
            let id = obj
                .get("id")
                .or_else(|| obj.get("slug"))
                .and_then(Value::as_str)
                .map(normalize_id)
                .filter(|id| !id.is_empty())
                .ok_or(InvalidShape)?;

            match obj.get("collection").and_then(Value::as_str) {
                Some(collection) => Ok(Some(EntryKey::new(collection, id))),
                // No explicit collection: the id may still be qualified.
                None => Ok(scalar_reference(id, own_collection)),
            }
        }
        Value::Bool(_) | Value::Array(_) => Err(InvalidShape),
    }
}

/// Resolve a scalar id into a key.
///
/// `other/some-id` is a qualified reference into collection `other` when the
/// prefix is slug-shaped; anything else is a bare id in `own_collection`.
/// Blank strings resolve to nothing.
fn scalar_reference(raw: &str, own_collection: &str) -> Option<EntryKey> {
    let trimmed = normalize_id(raw);
    if trimmed.is_empty() {
        return None;
    }
    if let Some((head, rest)) = trimmed.split_once('/') {
        if is_slug(head) && !rest.trim().is_empty() {
            return Some(EntryKey::new(head, rest));
        }
    }
    Some(EntryKey::new(own_collection, trimmed))
}

/// Slug shape: ASCII alphanumerics, `-`, `_`. Rules out URL schemes, dates,
/// and prose that happens to contain a slash.
fn is_slug(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ---------------------------------------------------------------------------
// Field discovery
// ---------------------------------------------------------------------------

/// Return `true` if a value is reference-shaped for discovery purposes.
///
/// Stricter than [`normalize_reference`]: bare strings don't count.
#[must_use]
pub fn is_reference_shaped(value: &Value) -> bool {
    match value {
        Value::String(s) => is_qualified(s),
        Value::Object(obj) => obj
            .get("id")
            .or_else(|| obj.get("slug"))
            .and_then(Value::as_str)
            .is_some_and(|id| !normalize_id(id).is_empty()),
        Value::Array(items) => {
            !items.is_empty()
                && items.iter().all(|item| match item {
                    Value::String(s) => is_qualified(s),
                    Value::Object(_) => is_reference_shaped(item),
                    _ => false,
                })
        }
        _ => false,
    }
}

fn is_qualified(s: &str) -> bool {
    normalize_id(s)
        .split_once('/')
        .is_some_and(|(head, rest)| is_slug(head) && !rest.trim().is_empty())
}

/// Discover the relation fields of a record, in declaration order.
///
/// Includes every field holding a reference-shaped value — the reserved
/// parent field among them when it qualifies. Callers that only want
/// ordinary relations filter with [`is_parent_field`].
#[must_use]
pub fn extract_relation_fields(data: &Value) -> Vec<String> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, value)| is_reference_shaped(value))
        .map(|(name, _)| name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
