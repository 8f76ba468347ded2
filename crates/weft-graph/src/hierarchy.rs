//! Parent/child linking and hierarchy derivation.
//!
//! # Overview
//!
//! Two passes over the loaded node set:
//!
//! - **Linking** resolves each node's declared `parent` value. Only a
//!   same-collection parent that exists in the build set links; a parent in
//!   another collection or a missing id leaves the node a root (a policy,
//!   not an error).
//! - **Derivation** walks the linked structure to fill in `ancestors`,
//!   `depth`, `descendants`, and `siblings`.
//!
//! # Cycle policy
//!
//! Raw data can describe parent cycles. Both walks carry visited sets: the
//! ancestor walk stops at the first revisit (the revisited node is treated
//! as if it had no parent) and records a warning; the descendant BFS skips
//! already-seen nodes. Derivation therefore terminates on any input.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use weft_core::{EntryKey, PARENT_FIELD, normalize_reference};

use crate::node::{Node, Relation, TreeRelation};
use crate::report::{BuildReport, BuildWarning};

// ---------------------------------------------------------------------------
// Phase A: linking
// ---------------------------------------------------------------------------

/// Resolve declared parent values into mutually consistent `parent` /
/// `children` links.
pub(crate) fn link_parents(
    nodes: &mut HashMap<EntryKey, Node>,
    ordered: &[EntryKey],
    report: &mut BuildReport,
) {
    let mut links: Vec<(EntryKey, EntryKey)> = Vec::new();

    for key in ordered {
        let Some(node) = nodes.get(key) else { continue };
        let Some(value) = node.record.field(PARENT_FIELD) else {
            continue;
        };

        let targets = match normalize_reference(value, &key.collection) {
            Ok(targets) => targets,
            Err(_) => {
                report.push(BuildWarning::InvalidReferenceShape {
                    key: key.clone(),
                    field: PARENT_FIELD.to_string(),
                });
                continue;
            }
        };

        // A collection defines a single parent; extra values are ignored.
        let Some(parent) = targets.into_iter().next() else {
            continue;
        };

        if parent == *key {
            report.push(BuildWarning::CycleDetected {
                at: key.clone(),
                revisited: key.clone(),
                chain: Vec::new(),
            });
            continue;
        }
        if parent.collection != key.collection {
            debug!(child = %key, parent = %parent, "cross-collection parent, treating child as root");
            continue;
        }
        if nodes.contains_key(&parent) {
            links.push((key.clone(), parent));
        } else {
            report.push(BuildWarning::DanglingReference {
                origin: key.clone(),
                field: PARENT_FIELD.to_string(),
                target: parent,
            });
        }
    }

    for (child, parent) in links {
        if let Some(node) = nodes.get_mut(&child) {
            node.relations.parent = Some(Relation::new(parent.clone(), PARENT_FIELD));
        }
        if let Some(node) = nodes.get_mut(&parent) {
            node.relations.children.push(Relation::new(child, PARENT_FIELD));
        }
    }
}

// ---------------------------------------------------------------------------
// Phase B: derivation
// ---------------------------------------------------------------------------

/// Derive `ancestors`, `depth`, `descendants`, and `siblings` for every
/// node from the linked parent/child structure.
pub(crate) fn derive(
    nodes: &mut HashMap<EntryKey, Node>,
    ordered: &[EntryKey],
    report: &mut BuildReport,
) {
    // Pure snapshots of the linked structure keep the walks borrow-free.
    let mut parent_of: HashMap<EntryKey, EntryKey> = HashMap::new();
    let mut children_of: HashMap<EntryKey, Vec<EntryKey>> = HashMap::new();
    for key in ordered {
        let Some(node) = nodes.get(key) else { continue };
        if let Some(parent) = &node.relations.parent {
            parent_of.insert(key.clone(), parent.target.clone());
        }
        if !node.relations.children.is_empty() {
            children_of.insert(
                key.clone(),
                node.relations
                    .children
                    .iter()
                    .map(|c| c.target.clone())
                    .collect(),
            );
        }
    }

    for key in ordered {
        let (ancestors, depth) = walk_ancestors(key, &parent_of, report);
        let descendants = walk_descendants(key, &children_of);
        let siblings = siblings_of(key, &parent_of, &children_of);

        if let Some(node) = nodes.get_mut(key) {
            node.relations.ancestors = ancestors;
            node.relations.depth = depth;
            node.relations.descendants = descendants;
            node.relations.siblings = siblings;
        }
    }
}

/// Walk `parent` upward, accumulating the distance-tagged chain.
///
/// The visited set guards against parent cycles: the first revisit ends the
/// walk as if the chain had reached a root.
fn walk_ancestors(
    key: &EntryKey,
    parent_of: &HashMap<EntryKey, EntryKey>,
    report: &mut BuildReport,
) -> (Vec<TreeRelation>, u32) {
    let mut visited: HashSet<EntryKey> = HashSet::from([key.clone()]);
    let mut chain: Vec<TreeRelation> = Vec::new();
    let mut depth: u32 = 0;

    let mut current = parent_of.get(key);
    while let Some(parent) = current {
        if !visited.insert(parent.clone()) {
            report.push(BuildWarning::CycleDetected {
                at: key.clone(),
                revisited: parent.clone(),
                chain: chain.iter().map(|a| a.target.clone()).collect(),
            });
            break;
        }
        depth += 1;
        chain.push(TreeRelation {
            target: parent.clone(),
            depth,
        });
        current = parent_of.get(parent);
    }

    (chain, depth)
}

/// Breadth-first walk over `children`, accumulating the distance-tagged
/// descendant set. Already-seen nodes are skipped, so the walk terminates
/// even when the linked structure loops.
fn walk_descendants(
    key: &EntryKey,
    children_of: &HashMap<EntryKey, Vec<EntryKey>>,
) -> Vec<TreeRelation> {
    let mut seen: HashSet<EntryKey> = HashSet::from([key.clone()]);
    let mut queue: VecDeque<(EntryKey, u32)> = children_of
        .get(key)
        .map_or(&[][..], Vec::as_slice)
        .iter()
        .map(|child| (child.clone(), 1))
        .collect();
    let mut out: Vec<TreeRelation> = Vec::new();

    while let Some((current, depth)) = queue.pop_front() {
        if !seen.insert(current.clone()) {
            continue;
        }
        out.push(TreeRelation {
            target: current.clone(),
            depth,
        });
        for child in children_of.get(&current).map_or(&[][..], Vec::as_slice) {
            if !seen.contains(child) {
                queue.push_back((child.clone(), depth + 1));
            }
        }
    }

    out
}

/// The parent's other children, in child-link order.
fn siblings_of(
    key: &EntryKey,
    parent_of: &HashMap<EntryKey, EntryKey>,
    children_of: &HashMap<EntryKey, Vec<EntryKey>>,
) -> Vec<EntryKey> {
    parent_of
        .get(key)
        .and_then(|parent| children_of.get(parent))
        .map(|children| children.iter().filter(|c| *c != key).cloned().collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
