//! Filesystem content source.
//!
//! Layout convention: each immediate subdirectory of the root is one
//! collection; each `*.json` file inside it is one record. Records are
//! loaded in file-name order so repeated loads over unchanged content are
//! byte-for-byte deterministic.
//!
//! The record identifier comes from the data bag (`slug`, then `id`); files
//! carrying neither fall back to the file stem. Unreadable or unparseable
//! files fail the collection load — a build would rather fail than silently
//! omit content.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::record::RawRecord;

use super::{ContentSource, SourceError};

/// A [`ContentSource`] over a directory tree of JSON records.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source rooted at `root`. The directory need not exist yet;
    /// a missing root simply lists no collections.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_records(&self, dir: &Path) -> Result<Vec<RawRecord>> {
        // Sort file names first so record order never depends on readdir order.
        let mut names: BTreeSet<String> = BTreeSet::new();
        for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".json") && entry.path().is_file() {
                names.insert(name);
            }
        }

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let text = fs::read_to_string(&path)
                .with_context(|| format!("read record {}", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("parse record {}", path.display()))?;

            let stem = name.trim_end_matches(".json");
            let record = match RawRecord::identifier_of(&value) {
                Some(id) => RawRecord::new(id, value),
                None => RawRecord::new(stem, value),
            };
            records.push(record);
        }

        debug!(dir = %dir.display(), count = records.len(), "loaded records");
        Ok(records)
    }
}

impl ContentSource for FsSource {
    fn list_collections(&self) -> Vec<String> {
        let Ok(read_dir) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let names: BTreeSet<String> = read_dir
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();

        names.into_iter().collect()
    }

    fn load_collection(&self, name: &str) -> Result<Vec<RawRecord>, SourceError> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(SourceError::UnknownCollection(name.to_string()));
        }
        self.read_records(&dir).map_err(|source| SourceError::Load {
            collection: name.to_string(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_record(root: &Path, collection: &str, file: &str, body: &str) {
        let dir = root.join(collection);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), body).unwrap();
    }

    #[test]
    fn lists_subdirectories_as_collections() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "posts", "a.json", "{}");
        write_record(tmp.path(), "authors", "jane.json", "{}");
        fs::write(tmp.path().join("stray.json"), "{}").unwrap(); // not a collection

        let source = FsSource::new(tmp.path());
        assert_eq!(source.list_collections(), vec!["authors", "posts"]);
    }

    #[test]
    fn missing_root_lists_nothing() {
        let source = FsSource::new("/nonexistent/weft-content-root");
        assert!(source.list_collections().is_empty());
    }

    #[test]
    fn loads_records_in_file_name_order() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "posts", "b.json", r#"{"id": "second"}"#);
        write_record(tmp.path(), "posts", "a.json", r#"{"id": "first"}"#);

        let source = FsSource::new(tmp.path());
        let records = source.load_collection("posts").unwrap();
        assert_eq!(records[0].id, "first");
        assert_eq!(records[1].id, "second");
    }

    #[test]
    fn identifier_falls_back_to_file_stem() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "posts", "intro.json", r#"{"title": "Intro"}"#);

        let source = FsSource::new(tmp.path());
        let records = source.load_collection("posts").unwrap();
        assert_eq!(records[0].id, "intro");
    }

    #[test]
    fn slug_in_bag_wins_over_file_stem() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "posts", "001.json", r#"{"slug": "hello-world"}"#);

        let source = FsSource::new(tmp.path());
        let records = source.load_collection("posts").unwrap();
        assert_eq!(records[0].id, "hello-world");
    }

    #[test]
    fn non_json_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "posts", "a.json", r#"{"id": "a"}"#);
        write_record(tmp.path(), "posts", "notes.txt", "not a record");

        let source = FsSource::new(tmp.path());
        assert_eq!(source.load_collection("posts").unwrap().len(), 1);
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let source = FsSource::new(tmp.path());
        let err = source.load_collection("ghosts").unwrap_err();
        assert!(matches!(err, SourceError::UnknownCollection(_)));
    }

    #[test]
    fn malformed_json_fails_the_load() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "posts", "bad.json", "{ not json");

        let source = FsSource::new(tmp.path());
        let err = source.load_collection("posts").unwrap_err();
        assert!(matches!(err, SourceError::Load { collection, .. } if collection == "posts"));
    }

    #[test]
    fn empty_collection_directory_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("posts")).unwrap();

        let source = FsSource::new(tmp.path());
        assert!(source.load_collection("posts").unwrap().is_empty());
    }
}
