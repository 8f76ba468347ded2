//! Composite node keys.
//!
//! Every record in the graph is addressed by an [`EntryKey`]: the pair of
//! its collection name and its normalized identifier. Two differently
//! formatted references to the same target must normalize to the same key,
//! so all constructors funnel through [`normalize_id`].
//!
//! Keys render and parse as `collection/id`, which is also the wire shape
//! used by qualified scalar references inside record data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Id normalization
// ---------------------------------------------------------------------------

/// Normalize a raw identifier for use inside an [`EntryKey`].
///
/// Trims surrounding whitespace; case is preserved. Normalization is
/// idempotent: `normalize_id(normalize_id(s)) == normalize_id(s)`.
#[must_use]
pub fn normalize_id(raw: &str) -> &str {
    raw.trim()
}

// ---------------------------------------------------------------------------
// EntryKey
// ---------------------------------------------------------------------------

/// The globally unique key of one node: `(collection, id)`.
///
/// Ordered and hashable so it can key both sorted and hashed indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    /// Name of the collection the node belongs to.
    pub collection: String,
    /// Normalized identifier within the collection.
    pub id: String,
}

impl EntryKey {
    /// Create a key, normalizing both components.
    #[must_use]
    pub fn new(collection: impl AsRef<str>, id: impl AsRef<str>) -> Self {
        Self {
            collection: normalize_id(collection.as_ref()).to_string(),
            id: normalize_id(id.as_ref()).to_string(),
        }
    }

    /// Return `true` if either component is empty after normalization.
    ///
    /// Empty keys never enter a graph; sources and the normalizer filter
    /// them out before node creation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty() || self.id.is_empty()
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Error returned when parsing a `collection/id` string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entry key '{0}': expected 'collection/id' with both parts non-empty")]
pub struct KeyParseError(pub String);

impl FromStr for EntryKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((collection, id)) = s.split_once('/') else {
            return Err(KeyParseError(s.to_string()));
        };
        let key = Self::new(collection, id);
        if key.is_empty() {
            return Err(KeyParseError(s.to_string()));
        }
        Ok(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_id("  jane "), "jane");
        assert_eq!(normalize_id("jane"), "jane");
    }

    #[test]
    fn normalize_preserves_case() {
        assert_eq!(normalize_id(" Jane-Doe "), "Jane-Doe");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_id("  spaced  ");
        assert_eq!(normalize_id(once), once);
    }

    #[test]
    fn new_normalizes_both_components() {
        let key = EntryKey::new(" authors ", " jane ");
        assert_eq!(key.collection, "authors");
        assert_eq!(key.id, "jane");
    }

    #[test]
    fn equal_keys_from_different_formatting() {
        assert_eq!(EntryKey::new("authors", "jane"), EntryKey::new(" authors", "jane "));
    }

    #[test]
    fn display_is_collection_slash_id() {
        let key = EntryKey::new("posts", "intro");
        assert_eq!(key.to_string(), "posts/intro");
    }

    #[test]
    fn parse_roundtrip() {
        let key: EntryKey = "authors/jane".parse().unwrap();
        assert_eq!(key, EntryKey::new("authors", "jane"));
        assert_eq!(key.to_string().parse::<EntryKey>().unwrap(), key);
    }

    #[test]
    fn parse_keeps_extra_slashes_in_id() {
        // Nested slugs live in the id component.
        let key: EntryKey = "docs/getting-started/install".parse().unwrap();
        assert_eq!(key.collection, "docs");
        assert_eq!(key.id, "getting-started/install");
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert!("authors".parse::<EntryKey>().is_err());
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert!("/jane".parse::<EntryKey>().is_err());
        assert!("authors/".parse::<EntryKey>().is_err());
        assert!("/".parse::<EntryKey>().is_err());
    }

    #[test]
    fn is_empty_flags_blank_components() {
        assert!(EntryKey::new("", "x").is_empty());
        assert!(EntryKey::new("x", "  ").is_empty());
        assert!(!EntryKey::new("x", "y").is_empty());
    }
}
