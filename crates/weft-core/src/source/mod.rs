//! Content sources: where collections of raw records come from.
//!
//! The graph engine consumes content through [`ContentSource`] — the
//! surface the content layer implements. Two implementations ship here:
//!
//! - [`MemorySource`] — records registered programmatically; the natural
//!   choice for tests and embedders that already hold their content.
//! - [`FsSource`] — each subdirectory of a root is a collection, each
//!   `*.json` file inside is one record.
//!
//! A failed or unknown collection load is fatal to a graph build; an empty
//! collection is valid and simply contributes zero nodes.

pub mod fs;
pub mod memory;

pub use fs::FsSource;
pub use memory::MemorySource;

use crate::record::RawRecord;

/// Internal navigation collections, excluded from default builds. They
/// exist for menu rendering, not content relations.
pub const NAV_COLLECTIONS: [&str; 2] = ["menus", "menu-items"];

/// Return `true` if `name` is an internal navigation collection.
#[must_use]
pub fn is_nav_collection(name: &str) -> bool {
    NAV_COLLECTIONS.contains(&name)
}

/// Errors raised while loading collections.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The named collection is not registered with this source.
    #[error("collection '{0}' is not registered")]
    UnknownCollection(String),

    /// The collection exists but loading its records failed.
    #[error("failed to load collection '{collection}': {source}")]
    Load {
        collection: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The content-layer surface the graph engine consumes.
///
/// Implementations must be deterministic: repeated calls over unchanged
/// content return the same collections and records in the same order.
pub trait ContentSource {
    /// All registered collection names, in stable order.
    fn list_collections(&self) -> Vec<String>;

    /// Load every record of one collection.
    ///
    /// # Errors
    ///
    /// [`SourceError::UnknownCollection`] for unregistered names,
    /// [`SourceError::Load`] when the collection exists but cannot be read.
    fn load_collection(&self, name: &str) -> Result<Vec<RawRecord>, SourceError>;

    /// The default build set: every registered collection except internal
    /// navigation collections.
    fn default_collections(&self) -> Vec<String> {
        self.list_collections()
            .into_iter()
            .filter(|name| !is_nav_collection(name))
            .collect()
    }
}
