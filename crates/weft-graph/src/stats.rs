//! Summary statistics over a built graph.
//!
//! # Statistics provided
//!
//! - **node_count / reference_edge_count**: totals over the materialized
//!   reference edges (deduplicated per source/target pair; dangling edges
//!   excluded — the build report counts those).
//! - **density**: `edges / (nodes * (nodes - 1))` for a directed graph.
//! - **scc_count / cycle_count**: strongly connected components of the
//!   reference graph and how many of them are real cycles (> 1 member).
//!   Reference cycles are legal — this is diagnostic, not an error signal.
//! - **weakly_connected_component_count / isolated_node_count**: how the
//!   content splits into islands.
//! - **max_in_degree / max_out_degree**: reference hot spots.
//! - **root_count / leaf_count / max_hierarchy_depth**: hierarchy shape.

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::{connected_components, tarjan_scc},
    graph::{DiGraph, NodeIndex},
    visit::IntoNodeIdentifiers,
};

use weft_core::EntryKey;

use crate::build::ContentGraph;

/// Summary statistics for one [`ContentGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of distinct reference edges between existing nodes.
    pub reference_edge_count: usize,
    /// Directed-graph density in `[0.0, 1.0]`; zero for 0–1 nodes.
    pub density: f64,
    /// Strongly connected components of the reference graph.
    pub scc_count: usize,
    /// SCCs with more than one member (reference cycles).
    pub cycle_count: usize,
    /// Weakly connected components (disjoint islands).
    pub weakly_connected_component_count: usize,
    /// Nodes with no reference edges in either direction.
    pub isolated_node_count: usize,
    /// Highest number of incoming reference edges on one node.
    pub max_in_degree: usize,
    /// Highest number of outgoing reference edges from one node.
    pub max_out_degree: usize,
    /// Nodes with no resolved parent.
    pub root_count: usize,
    /// Nodes with no children.
    pub leaf_count: usize,
    /// Deepest hierarchy level across all collections.
    pub max_hierarchy_depth: u32,
}

impl GraphStats {
    /// Compute statistics from a built graph.
    #[must_use]
    pub fn from_graph(graph: &ContentGraph) -> Self {
        let view = reference_view(graph);

        let node_count = view.node_count();
        let reference_edge_count = view.edge_count();
        let density = compute_density(node_count, reference_edge_count);

        let sccs = tarjan_scc(&view);
        let scc_count = sccs.len();
        let cycle_count = sccs.iter().filter(|scc| scc.len() > 1).count();

        let weakly_connected_component_count = connected_components(&view);

        let isolated_node_count = view
            .node_identifiers()
            .filter(|&idx| {
                view.neighbors_directed(idx, Direction::Incoming).next().is_none()
                    && view.neighbors_directed(idx, Direction::Outgoing).next().is_none()
            })
            .count();

        let max_in_degree = view
            .node_identifiers()
            .map(|idx| view.neighbors_directed(idx, Direction::Incoming).count())
            .max()
            .unwrap_or(0);
        let max_out_degree = view
            .node_identifiers()
            .map(|idx| view.neighbors_directed(idx, Direction::Outgoing).count())
            .max()
            .unwrap_or(0);

        let mut root_count = 0;
        let mut leaf_count = 0;
        let mut max_hierarchy_depth = 0;
        for node in graph.iter() {
            if node.relations.is_root() {
                root_count += 1;
            }
            if node.relations.is_leaf() {
                leaf_count += 1;
            }
            max_hierarchy_depth = max_hierarchy_depth.max(node.relations.depth);
        }

        Self {
            node_count,
            reference_edge_count,
            density,
            scc_count,
            cycle_count,
            weakly_connected_component_count,
            isolated_node_count,
            max_in_degree,
            max_out_degree,
            root_count,
            leaf_count,
            max_hierarchy_depth,
        }
    }

    /// `true` if the reference graph contains at least one cycle.
    #[must_use]
    pub fn has_reference_cycles(&self) -> bool {
        self.cycle_count > 0
    }

    /// `true` if no node references another.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.reference_edge_count == 0
    }
}

/// Materialize the deduplicated reference edges between existing nodes as a
/// petgraph view.
fn reference_view(graph: &ContentGraph) -> DiGraph<EntryKey, ()> {
    let mut view = DiGraph::<EntryKey, ()>::new();
    let mut index_of: HashMap<EntryKey, NodeIndex> = HashMap::with_capacity(graph.len());

    for node in graph.iter() {
        let idx = view.add_node(node.key.clone());
        index_of.insert(node.key.clone(), idx);
    }

    for node in graph.iter() {
        let Some(&from) = index_of.get(&node.key) else {
            continue;
        };
        for relation in &node.relations.references {
            if let Some(&to) = index_of.get(&relation.target) {
                if !view.contains_edge(from, to) {
                    view.add_edge(from, to, ());
                }
            }
        }
    }

    view
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
