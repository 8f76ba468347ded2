//! Graph nodes and their derived relation data.
//!
//! A [`Node`] wraps one raw record together with everything the build
//! pipeline derives about it: direct references both ways, hierarchy links,
//! distance-tagged ancestor/descendant chains, and transitive relations.
//! Nodes are enriched in place during construction and immutable once the
//! graph is published.

use serde::{Deserialize, Serialize};
use weft_core::{EntryKey, RawRecord};

// ---------------------------------------------------------------------------
// Relation kinds
// ---------------------------------------------------------------------------

/// A directed relation to another node, tagged with the field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Key of the related node (may be dangling for forward edges).
    pub target: EntryKey,
    /// Name of the record field that declared the relation.
    pub field: String,
}

impl Relation {
    /// Create a relation.
    #[must_use]
    pub fn new(target: EntryKey, field: impl Into<String>) -> Self {
        Self {
            target,
            field: field.into(),
        }
    }
}

/// A hierarchy relation tagged with its distance from the owning node.
///
/// Ancestors count hops upward (immediate parent = 1); descendants count
/// hops downward (direct child = 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRelation {
    pub target: EntryKey,
    pub depth: u32,
}

/// A transitive relation discovered over reference edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectRelation {
    /// Key of the discovered node.
    pub target: EntryKey,
    /// BFS depth at first discovery (shortest-path hop count, always ≥ 2).
    pub depth: u32,
    /// Witness path as collection names, origin through target inclusive.
    pub path: Vec<String>,
}

// ---------------------------------------------------------------------------
// RelationMap
// ---------------------------------------------------------------------------

/// Everything derived about one node's relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMap {
    /// Outgoing relations, in field declaration order then value order.
    pub references: Vec<Relation>,
    /// Relations pointing at this node, in build order.
    pub referenced_by: Vec<Relation>,
    /// The resolved parent, if any. Always within the same collection.
    pub parent: Option<Relation>,
    /// Nodes whose `parent` points back at this node.
    pub children: Vec<Relation>,
    /// Other children of the same parent, excluding self.
    pub siblings: Vec<EntryKey>,
    /// Chain from immediate parent toward the root, distance-tagged.
    pub ancestors: Vec<TreeRelation>,
    /// All transitive children, distance-tagged.
    pub descendants: Vec<TreeRelation>,
    /// Transitive relations over reference edges, hop ≥ 2.
    pub indirect: Vec<IndirectRelation>,
    /// Number of ancestors (0 for roots).
    pub depth: u32,
}

impl RelationMap {
    /// A node with no resolved parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// A node with no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Inverse of [`is_leaf`](Self::is_leaf).
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.is_leaf()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One content record plus its derived relation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique key.
    pub key: EntryKey,
    /// The wrapped record.
    pub record: RawRecord,
    /// Derived relations, filled in by the build phases.
    pub relations: RelationMap,
}

impl Node {
    /// Wrap a record under its key with empty relations.
    #[must_use]
    pub fn new(key: EntryKey, record: RawRecord) -> Self {
        Self {
            key,
            record,
            relations: RelationMap::default(),
        }
    }

    /// The owning collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.key.collection
    }

    /// The normalized identifier within the collection.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.key.id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
