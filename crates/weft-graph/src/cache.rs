//! Graph cache: one build, swapped atomically.
//!
//! [`GraphCache`] owns a content source and at most one built graph. All
//! read paths go through it: [`get_or_build`](GraphCache::get_or_build)
//! serves the cached graph when allowed, or runs a full build and publishes
//! it with a single slot swap — concurrent readers observe either the
//! fully-old or the fully-new graph, never a mix.
//!
//! Invalidation is wholesale: [`clear`](GraphCache::clear) drops the graph
//! and the next call rebuilds from the source. There is no per-collection
//! invalidation.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, instrument};

use weft_core::ContentSource;

use crate::build::{BuildError, BuildOptions, ContentGraph, build_graph};

/// A caller-owned cache over one [`ContentSource`].
///
/// Construct once at startup and share by reference; the cache is internally
/// synchronized.
#[derive(Debug)]
pub struct GraphCache<S> {
    source: S,
    slot: RwLock<Option<Arc<ContentGraph>>>,
}

impl<S: ContentSource> GraphCache<S> {
    /// Create an empty cache over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: RwLock::new(None),
        }
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached graph, or build one.
    ///
    /// With `options.cache == true` (the default) the cached instance is
    /// served when present and a fresh build is stored for the next caller.
    /// With `options.cache == false` the cache is bypassed entirely: the
    /// build is returned without being stored.
    ///
    /// # Errors
    ///
    /// Propagates [`BuildError`] from the underlying build; the cache slot
    /// is left untouched on failure.
    #[instrument(skip(self, options))]
    pub fn get_or_build(&self, options: &BuildOptions) -> Result<Arc<ContentGraph>, BuildError> {
        if options.cache {
            if let Some(graph) = self.cached() {
                debug!(nodes = graph.len(), "serving cached graph");
                return Ok(graph);
            }
        }

        let graph = Arc::new(build_graph(&self.source, options)?);
        if options.cache {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            *slot = Some(Arc::clone(&graph));
        }
        Ok(graph)
    }

    /// The currently cached graph, if any.
    pub fn cached(&self) -> Option<Arc<ContentGraph>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop the cached graph. The next [`get_or_build`](Self::get_or_build)
    /// rebuilds from the source.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            info!("graph cache cleared");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use weft_core::{MemorySource, RawRecord, SourceError};

    /// A source whose contents can change between builds, for exercising
    /// invalidation.
    #[derive(Debug, Clone)]
    struct SharedSource(Rc<RefCell<MemorySource>>);

    impl SharedSource {
        fn new(inner: MemorySource) -> Self {
            Self(Rc::new(RefCell::new(inner)))
        }

        fn replace(&self, inner: MemorySource) {
            *self.0.borrow_mut() = inner;
        }
    }

    impl ContentSource for SharedSource {
        fn list_collections(&self) -> Vec<String> {
            self.0.borrow().list_collections()
        }

        fn load_collection(&self, name: &str) -> Result<Vec<RawRecord>, SourceError> {
            self.0.borrow().load_collection(name)
        }
    }

    fn posts(ids: &[&str]) -> MemorySource {
        MemorySource::new().with_collection(
            "posts",
            ids.iter().map(|id| RawRecord::new(*id, json!({}))).collect(),
        )
    }

    #[test]
    fn consecutive_cached_builds_return_the_identical_instance() {
        let cache = GraphCache::new(posts(&["a"]));
        let options = BuildOptions::default();

        let first = cache.get_or_build(&options).unwrap();
        let second = cache.get_or_build(&options).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clear_forces_a_rebuild_reflecting_changed_data() {
        let source = SharedSource::new(posts(&["a"]));
        let cache = GraphCache::new(source.clone());
        let options = BuildOptions::default();

        let first = cache.get_or_build(&options).unwrap();
        assert_eq!(first.len(), 1);

        source.replace(posts(&["a", "b"]));
        // Still serving the stale snapshot until cleared.
        assert_eq!(cache.get_or_build(&options).unwrap().len(), 1);

        cache.clear();
        let rebuilt = cache.get_or_build(&options).unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
    }

    #[test]
    fn cache_false_bypasses_without_storing() {
        let cache = GraphCache::new(posts(&["a"]));
        let options = BuildOptions {
            cache: false,
            ..BuildOptions::default()
        };

        let first = cache.get_or_build(&options).unwrap();
        let second = cache.get_or_build(&options).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.cached().is_none());
    }

    #[test]
    fn cache_false_does_not_serve_a_stored_graph() {
        let cache = GraphCache::new(posts(&["a"]));
        let cached = cache.get_or_build(&BuildOptions::default()).unwrap();

        let bypass = cache
            .get_or_build(&BuildOptions {
                cache: false,
                ..BuildOptions::default()
            })
            .unwrap();
        assert!(!Arc::ptr_eq(&cached, &bypass));
        // The stored graph survives the bypass.
        assert!(cache.cached().is_some());
    }

    #[test]
    fn failed_build_leaves_cache_empty() {
        let cache = GraphCache::new(MemorySource::new());
        let options = BuildOptions {
            collections: Some(vec!["ghosts".to_string()]),
            ..BuildOptions::default()
        };
        assert!(cache.get_or_build(&options).is_err());
        assert!(cache.cached().is_none());
    }

    #[test]
    fn clear_on_empty_cache_is_a_noop() {
        let cache = GraphCache::new(posts(&[]));
        cache.clear();
        assert!(cache.cached().is_none());
    }
}
