//! In-memory content source.

use std::collections::BTreeMap;

use crate::record::RawRecord;

use super::{ContentSource, SourceError};

/// A [`ContentSource`] over records registered programmatically.
///
/// Collections are kept in name order; records keep their registration
/// order. Loading clones, so one source can feed any number of builds.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: BTreeMap<String, Vec<RawRecord>>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, replacing any previous registration.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<RawRecord>) {
        self.collections.insert(name.into(), records);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.insert(name, records);
        self
    }
}

impl ContentSource for MemorySource {
    fn list_collections(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    fn load_collection(&self, name: &str) -> Result<Vec<RawRecord>, SourceError> {
        self.collections
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::UnknownCollection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lists_collections_in_name_order() {
        let source = MemorySource::new()
            .with_collection("posts", vec![])
            .with_collection("authors", vec![]);
        assert_eq!(source.list_collections(), vec!["authors", "posts"]);
    }

    #[test]
    fn loads_registered_records_in_registration_order() {
        let source = MemorySource::new().with_collection(
            "posts",
            vec![
                RawRecord::new("b", json!({})),
                RawRecord::new("a", json!({})),
            ],
        );
        let records = source.load_collection("posts").unwrap();
        assert_eq!(records[0].id, "b");
        assert_eq!(records[1].id, "a");
    }

    #[test]
    fn empty_collection_loads_as_empty() {
        let source = MemorySource::new().with_collection("posts", vec![]);
        assert!(source.load_collection("posts").unwrap().is_empty());
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let source = MemorySource::new();
        let err = source.load_collection("ghosts").unwrap_err();
        assert!(matches!(err, SourceError::UnknownCollection(name) if name == "ghosts"));
    }
}
