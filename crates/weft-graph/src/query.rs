//! Read helpers over a built graph.
//!
//! Pure functions for the common rendering-layer questions: the entries of
//! a collection, a node's relations, a parent's children (direct or
//! recursive), and a collection's roots and leaves. None of them trigger a
//! rebuild — pair them with [`crate::cache::GraphCache`] for that.
//!
//! List results are sorted with [`by_order`]: ascending numeric `order`
//! field, records without one after records with one, ties by id. Callers
//! wanting a different order re-sort the returned records.

use std::cmp::Ordering;

use weft_core::{EntryKey, RawRecord};

use crate::build::ContentGraph;
use crate::node::{Node, RelationMap};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for [`children_of`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildrenOpts {
    /// Include transitive children instead of direct children only.
    pub recursive: bool,
    /// With `recursive`, bound the descent depth (`None` = unbounded).
    pub max_depth: Option<u32>,
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// The canonical sibling order: ascending `order`, missing last, id ties.
#[must_use]
pub fn by_order(a: &RawRecord, b: &RawRecord) -> Ordering {
    match (a.order(), b.order()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

fn sorted(mut records: Vec<&RawRecord>) -> Vec<&RawRecord> {
    records.sort_by(|a, b| by_order(a, b));
    records
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// All records of one collection, in load order.
#[must_use]
pub fn entries_of<'g>(graph: &'g ContentGraph, collection: &str) -> Vec<&'g RawRecord> {
    graph
        .keys_of(collection)
        .iter()
        .filter_map(|key| graph.node(key))
        .map(|node| &node.record)
        .collect()
}

/// A node's relation map.
#[must_use]
pub fn relations_of<'g>(graph: &'g ContentGraph, key: &EntryKey) -> Option<&'g RelationMap> {
    graph.relations_of(key)
}

/// The children of `parent_id` within `collection`, sorted by [`by_order`].
///
/// Direct children by default; with [`ChildrenOpts::recursive`] the full
/// descendant set, optionally bounded by [`ChildrenOpts::max_depth`].
/// Unknown parents yield an empty list.
#[must_use]
pub fn children_of<'g>(
    graph: &'g ContentGraph,
    collection: &str,
    parent_id: &str,
    opts: ChildrenOpts,
) -> Vec<&'g RawRecord> {
    let parent = EntryKey::new(collection, parent_id);
    let Some(relations) = graph.relations_of(&parent) else {
        return Vec::new();
    };

    let records: Vec<&RawRecord> = if opts.recursive {
        relations
            .descendants
            .iter()
            .filter(|d| opts.max_depth.is_none_or(|bound| d.depth <= bound))
            .filter_map(|d| graph.node(&d.target))
            .map(|node| &node.record)
            .collect()
    } else {
        relations
            .children
            .iter()
            .filter_map(|c| graph.node(&c.target))
            .map(|node| &node.record)
            .collect()
    };

    sorted(records)
}

/// Root entries of a collection (no resolved parent), sorted by [`by_order`].
#[must_use]
pub fn roots_of<'g>(graph: &'g ContentGraph, collection: &str) -> Vec<&'g RawRecord> {
    collect_where(graph, collection, RelationMap::is_root)
}

/// Leaf entries of a collection (no children), sorted by [`by_order`].
#[must_use]
pub fn leaves_of<'g>(graph: &'g ContentGraph, collection: &str) -> Vec<&'g RawRecord> {
    collect_where(graph, collection, RelationMap::is_leaf)
}

fn collect_where<'g>(
    graph: &'g ContentGraph,
    collection: &str,
    keep: impl Fn(&RelationMap) -> bool,
) -> Vec<&'g RawRecord> {
    let records: Vec<&RawRecord> = graph
        .keys_of(collection)
        .iter()
        .filter_map(|key| graph.node(key))
        .filter(|node: &&Node| keep(&node.relations))
        .map(|node| &node.record)
        .collect();
    sorted(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
