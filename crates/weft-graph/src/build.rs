//! Graph construction.
//!
//! # Overview
//!
//! [`build_graph`] runs the full pipeline over a [`ContentSource`] snapshot:
//!
//! 1. **Entry store** — load every record of the selected collections and
//!    key each one as `(collection, id)`.
//! 2. **Direct references** — resolve declared reference fields into forward
//!    edges, mirror them as reverse edges on existing targets, and maintain
//!    the global target → sources index.
//! 3. **Hierarchy** — link same-collection parent/child edges, then derive
//!    depth, ancestors, descendants, and siblings per node.
//! 4. **Indirect relations** — optional bounded BFS over reference edges.
//!
//! Phases run strictly in order over the fully loaded node set; a graph is
//! never observable half-built. Only a collection-load failure aborts the
//! build — every other condition degrades into the [`BuildReport`].
//!
//! ## Content hash
//!
//! The finished graph carries a BLAKE3 fingerprint of its sorted node and
//! edge sets, so embedders can detect whether a rebuild actually changed
//! anything.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use weft_core::{
    ContentSource, EntryKey, SourceError, extract_relation_fields, is_parent_field,
    normalize_reference,
};

use crate::node::{Node, Relation, RelationMap};
use crate::report::{BuildReport, BuildWarning};
use crate::{hierarchy, indirect};

/// Default hop bound for indirect-relation resolution.
pub const DEFAULT_INDIRECT_DEPTH: u32 = 3;

// ---------------------------------------------------------------------------
// Options and errors
// ---------------------------------------------------------------------------

/// Options for one graph build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Collections to include. `None` selects every registered collection
    /// except the internal navigation collections.
    pub collections: Option<Vec<String>>,
    /// Whether to run the indirect-relation resolver.
    pub include_indirect: bool,
    /// Hop bound for indirect resolution.
    pub max_indirect_depth: u32,
    /// Whether [`crate::cache::GraphCache`] may serve and store this build.
    pub cache: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            collections: None,
            include_indirect: false,
            max_indirect_depth: DEFAULT_INDIRECT_DEPTH,
            cache: true,
        }
    }
}

/// Errors that abort a graph build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A named collection could not be loaded. The build fails rather than
    /// silently omitting a collection.
    #[error(transparent)]
    CollectionLoad(#[from] SourceError),
}

// ---------------------------------------------------------------------------
// ContentGraph
// ---------------------------------------------------------------------------

/// A fully built relationship graph over one content snapshot.
///
/// Immutable once returned from [`build_graph`]; rebuild instead of
/// mutating. All iteration surfaces are deterministic: collections sort by
/// name, keys keep load order within their collection.
#[derive(Debug, Clone)]
pub struct ContentGraph {
    nodes: HashMap<EntryKey, Node>,
    by_collection: BTreeMap<String, Vec<EntryKey>>,
    by_reference: HashMap<EntryKey, Vec<EntryKey>>,
    collections: Vec<String>,
    total_entries: usize,
    content_hash: String,
    report: BuildReport,
}

impl ContentGraph {
    /// Look up a node by key.
    #[must_use]
    pub fn node(&self, key: &EntryKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// `true` if the key is in the node set.
    #[must_use]
    pub fn contains(&self, key: &EntryKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// A node's relation map.
    #[must_use]
    pub fn relations_of(&self, key: &EntryKey) -> Option<&RelationMap> {
        self.nodes.get(key).map(|node| &node.relations)
    }

    /// The collections this graph was built over, in build order.
    #[must_use]
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Keys of one collection, in load order. Empty for unknown names.
    #[must_use]
    pub fn keys_of(&self, collection: &str) -> &[EntryKey] {
        self.by_collection
            .get(collection)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Source keys referencing `target`, in build order. Works for dangling
    /// targets too.
    #[must_use]
    pub fn referencing(&self, target: &EntryKey) -> &[EntryKey] {
        self.by_reference
            .get(target)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Iterate all nodes, collection by collection in sorted name order,
    /// load order within.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.by_collection
            .values()
            .flatten()
            .filter_map(|key| self.nodes.get(key))
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total_entries
    }

    /// `true` when the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }

    /// BLAKE3 fingerprint of the node and edge sets.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Warnings accumulated during the build.
    #[must_use]
    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}

// ---------------------------------------------------------------------------
// build_graph
// ---------------------------------------------------------------------------

/// Run the full build pipeline over `source`.
///
/// # Errors
///
/// Returns [`BuildError::CollectionLoad`] when any selected collection
/// fails to load. All other conditions are recorded in the graph's
/// [`BuildReport`].
#[instrument(skip(source, options))]
pub fn build_graph<S: ContentSource>(
    source: &S,
    options: &BuildOptions,
) -> Result<ContentGraph, BuildError> {
    let requested = match &options.collections {
        Some(named) => named.clone(),
        None => source.default_collections(),
    };

    let mut report = BuildReport::default();
    let mut nodes: HashMap<EntryKey, Node> = HashMap::new();
    let mut by_collection: BTreeMap<String, Vec<EntryKey>> = BTreeMap::new();
    let mut ordered: Vec<EntryKey> = Vec::new();
    let mut collections: Vec<String> = Vec::new();

    // Phase 1: entry store.
    for collection in requested {
        if collections.contains(&collection) {
            continue;
        }
        let records = source.load_collection(&collection)?;
        debug!(collection = %collection, count = records.len(), "loaded collection");

        let keys = by_collection.entry(collection.clone()).or_default();
        for record in records {
            let key = record.key(&collection);
            if key.is_empty() {
                warn!(collection = %collection, "skipping record with empty identifier");
                continue;
            }
            if nodes.contains_key(&key) {
                warn!(key = %key, "duplicate entry key, keeping first record");
                continue;
            }
            keys.push(key.clone());
            ordered.push(key.clone());
            nodes.insert(key.clone(), Node::new(key, record));
        }
        collections.push(collection);
    }

    // Phase 2: direct references.
    let by_reference = index_references(&mut nodes, &ordered, &mut report);

    // Phase 3: hierarchy.
    hierarchy::link_parents(&mut nodes, &ordered, &mut report);
    hierarchy::derive(&mut nodes, &ordered, &mut report);

    // Phase 4: indirect relations.
    if options.include_indirect {
        indirect::resolve(&mut nodes, &ordered, options.max_indirect_depth);
    }

    let content_hash = fingerprint(&nodes, &ordered);
    let total_entries = ordered.len();
    debug!(
        nodes = total_entries,
        warnings = report.warning_count(),
        "graph build complete"
    );

    Ok(ContentGraph {
        nodes,
        by_collection,
        by_reference,
        collections,
        total_entries,
        content_hash,
        report,
    })
}

// ---------------------------------------------------------------------------
// Direct reference indexing
// ---------------------------------------------------------------------------

/// Resolve every non-parent relation field into forward edges, mirror them
/// as reverse edges on existing targets, and build the global
/// target → sources index.
///
/// Relation fields are discovered per collection: a field counts as
/// relational when any record of the collection holds a reference-shaped
/// value under it. A record whose value for a relational field fails to
/// normalize gets an invalid-shape warning and contributes zero relations
/// for that field.
fn index_references(
    nodes: &mut HashMap<EntryKey, Node>,
    ordered: &[EntryKey],
    report: &mut BuildReport,
) -> HashMap<EntryKey, Vec<EntryKey>> {
    // Pass 1: per-collection relation field sets.
    let mut fields_of: HashMap<&str, HashSet<String>> = HashMap::new();
    for key in ordered {
        let Some(node) = nodes.get(key) else { continue };
        for field in extract_relation_fields(&node.record.data) {
            fields_of
                .entry(key.collection.as_str())
                .or_default()
                .insert(field);
        }
    }

    // Pass 2: collect the full edge list; nodes are only mutated afterwards.
    let mut edges: Vec<(EntryKey, String, EntryKey)> = Vec::new();
    let mut invalid: Vec<(EntryKey, String)> = Vec::new();

    for key in ordered {
        let Some(node) = nodes.get(key) else { continue };
        let Some(relational) = fields_of.get(key.collection.as_str()) else {
            continue;
        };
        let Some(data) = node.record.data.as_object() else {
            continue;
        };
        // The record's own declaration order decides reference order.
        for (field, value) in data {
            if is_parent_field(field) || !relational.contains(field) {
                continue;
            }
            match normalize_reference(value, &key.collection) {
                Ok(targets) => {
                    for target in targets {
                        edges.push((key.clone(), field.clone(), target));
                    }
                }
                Err(_) => invalid.push((key.clone(), field.clone())),
            }
        }
    }

    for (key, field) in invalid {
        report.push(BuildWarning::InvalidReferenceShape { key, field });
    }

    let mut by_reference: HashMap<EntryKey, Vec<EntryKey>> = HashMap::new();
    let mut indexed: HashSet<(EntryKey, EntryKey)> = HashSet::new();

    for (origin, field, target) in edges {
        let target_exists = nodes.contains_key(&target);

        if let Some(node) = nodes.get_mut(&origin) {
            node.relations
                .references
                .push(Relation::new(target.clone(), field.clone()));
        }

        if target_exists {
            if let Some(node) = nodes.get_mut(&target) {
                node.relations
                    .referenced_by
                    .push(Relation::new(origin.clone(), field.clone()));
            }
        } else {
            report.push(BuildWarning::DanglingReference {
                origin: origin.clone(),
                field,
                target: target.clone(),
            });
        }

        // One index entry per (target, origin) pair regardless of how many
        // fields declare the edge.
        if indexed.insert((target.clone(), origin.clone())) {
            by_reference.entry(target).or_default().push(origin);
        }
    }

    by_reference
}

// ---------------------------------------------------------------------------
// Fingerprinting
// ---------------------------------------------------------------------------

/// BLAKE3 hash over the sorted node keys and edge list, so the hash changes
/// exactly when the graph's structure changes.
fn fingerprint(nodes: &HashMap<EntryKey, Node>, ordered: &[EntryKey]) -> String {
    let mut keys: Vec<&EntryKey> = ordered.iter().collect();
    keys.sort();

    let mut edges: Vec<String> = Vec::new();
    for key in &keys {
        if let Some(node) = nodes.get(*key) {
            for relation in &node.relations.references {
                edges.push(format!("{key} {} {}", relation.field, relation.target));
            }
            if let Some(parent) = &node.relations.parent {
                edges.push(format!("{key} {} {}", parent.field, parent.target));
            }
        }
    }
    edges.sort();

    let mut hasher = blake3::Hasher::new();
    for key in keys {
        hasher.update(key.to_string().as_bytes());
        hasher.update(b"\x00");
    }
    for edge in edges {
        hasher.update(edge.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
