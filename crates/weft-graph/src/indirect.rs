//! Indirect relation resolution.
//!
//! # Overview
//!
//! For each node, a bounded breadth-first search over outgoing `references`
//! edges (never hierarchy edges) surfaces the transitive neighborhood:
//! every node reachable in 2..=`max_depth` hops, tagged with its shortest
//! hop distance and one witness path of collection names.
//!
//! The search seeds from the direct targets at hop 1 and pre-marks them
//! visited, so hop-1 results (which would duplicate `references`) are never
//! recorded and every reachable key appears exactly once at its minimum
//! depth. The per-search visited set also guarantees termination over
//! cyclic reference data.
//!
//! Dangling targets are legitimate edges, so they can surface in results;
//! they simply have no outgoing edges to expand.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use weft_core::EntryKey;

use crate::node::{IndirectRelation, Node};

/// Fill `indirect` on every node.
pub(crate) fn resolve(
    nodes: &mut HashMap<EntryKey, Node>,
    ordered: &[EntryKey],
    max_depth: u32,
) {
    // Snapshot outgoing targets per node (order-preserving, deduplicated).
    let mut targets_of: HashMap<EntryKey, Vec<EntryKey>> = HashMap::with_capacity(ordered.len());
    for key in ordered {
        let Some(node) = nodes.get(key) else { continue };
        let mut seen: HashSet<&EntryKey> = HashSet::new();
        let targets: Vec<EntryKey> = node
            .relations
            .references
            .iter()
            .filter(|r| seen.insert(&r.target))
            .map(|r| r.target.clone())
            .collect();
        targets_of.insert(key.clone(), targets);
    }

    for origin in ordered {
        let found = search(origin, &targets_of, max_depth);
        if let Some(node) = nodes.get_mut(origin) {
            node.relations.indirect = found;
        }
    }
    debug!(nodes = ordered.len(), max_depth, "indirect relations resolved");
}

/// BFS from one origin. Pure: reads only the snapshot.
fn search(
    origin: &EntryKey,
    targets_of: &HashMap<EntryKey, Vec<EntryKey>>,
    max_depth: u32,
) -> Vec<IndirectRelation> {
    let mut visited: HashSet<EntryKey> = HashSet::from([origin.clone()]);
    let mut queue: VecDeque<(EntryKey, u32, Vec<String>)> = VecDeque::new();

    for target in targets_of.get(origin).map_or(&[][..], Vec::as_slice) {
        if visited.insert(target.clone()) {
            let path = vec![origin.collection.clone(), target.collection.clone()];
            queue.push_back((target.clone(), 1, path));
        }
    }

    let mut found: Vec<IndirectRelation> = Vec::new();
    while let Some((key, depth, path)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for next in targets_of.get(&key).map_or(&[][..], Vec::as_slice) {
            if visited.insert(next.clone()) {
                let mut next_path = path.clone();
                next_path.push(next.collection.clone());
                found.push(IndirectRelation {
                    target: next.clone(),
                    depth: depth + 1,
                    path: next_path.clone(),
                });
                queue.push_back((next.clone(), depth + 1, next_path));
            }
        }
    }

    found
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildOptions, build_graph};
    use serde_json::json;
    use weft_core::{MemorySource, RawRecord};

    fn key(collection: &str, id: &str) -> EntryKey {
        EntryKey::new(collection, id)
    }

    /// posts/a → authors/jane → books/ref → posts/a (a reference cycle
    /// crossing three collections).
    fn chain_source() -> MemorySource {
        MemorySource::new()
            .with_collection(
                "posts",
                vec![RawRecord::new("a", json!({"author": "authors/jane"}))],
            )
            .with_collection(
                "authors",
                vec![RawRecord::new("jane", json!({"favorite": "books/ref"}))],
            )
            .with_collection(
                "books",
                vec![RawRecord::new("ref", json!({"discussed-in": "posts/a"}))],
            )
    }

    fn options(max_depth: u32) -> BuildOptions {
        BuildOptions {
            include_indirect: true,
            max_indirect_depth: max_depth,
            ..BuildOptions::default()
        }
    }

    #[test]
    fn hop_one_targets_are_not_recorded() {
        let graph = build_graph(&chain_source(), &options(3)).unwrap();
        let post = graph.relations_of(&key("posts", "a")).unwrap();
        assert!(
            post.indirect.iter().all(|r| r.target != key("authors", "jane")),
            "direct target must stay out of indirect"
        );
    }

    #[test]
    fn transitive_targets_carry_hop_and_witness_path() {
        let graph = build_graph(&chain_source(), &options(3)).unwrap();
        let post = graph.relations_of(&key("posts", "a")).unwrap();

        assert_eq!(post.indirect.len(), 1);
        let book = &post.indirect[0];
        assert_eq!(book.target, key("books", "ref"));
        assert_eq!(book.depth, 2);
        assert_eq!(book.path, ["posts", "authors", "books"]);
    }

    #[test]
    fn origin_never_appears_in_its_own_results() {
        // The chain loops back to posts/a at hop 3.
        let graph = build_graph(&chain_source(), &options(5)).unwrap();
        let post = graph.relations_of(&key("posts", "a")).unwrap();
        assert!(post.indirect.iter().all(|r| r.target != key("posts", "a")));
    }

    #[test]
    fn depth_bound_cuts_the_search() {
        let graph = build_graph(&chain_source(), &options(1)).unwrap();
        let post = graph.relations_of(&key("posts", "a")).unwrap();
        assert!(post.indirect.is_empty());
    }

    #[test]
    fn shortest_path_wins_over_longer_route() {
        // a → b → d and a → c → e → d: d is discovered at hop 2, once.
        let source = MemorySource::new().with_collection(
            "posts",
            vec![
                RawRecord::new("a", json!({"refs": ["posts/b", "posts/c"]})),
                RawRecord::new("b", json!({"refs": ["posts/d"]})),
                RawRecord::new("c", json!({"refs": ["posts/e"]})),
                RawRecord::new("d", json!({})),
                RawRecord::new("e", json!({"refs": ["posts/d"]})),
            ],
        );
        let graph = build_graph(&source, &options(4)).unwrap();
        let a = graph.relations_of(&key("posts", "a")).unwrap();

        let d_hits: Vec<&IndirectRelation> = a
            .indirect
            .iter()
            .filter(|r| r.target == key("posts", "d"))
            .collect();
        assert_eq!(d_hits.len(), 1, "exactly one record for d");
        assert_eq!(d_hits[0].depth, 2, "minimum hop count");
    }

    #[test]
    fn reference_cycles_terminate() {
        let source = MemorySource::new().with_collection(
            "posts",
            vec![
                RawRecord::new("a", json!({"next": "posts/b"})),
                RawRecord::new("b", json!({"next": "posts/c"})),
                RawRecord::new("c", json!({"next": "posts/a"})),
            ],
        );
        let graph = build_graph(&source, &options(10)).unwrap();

        let a = graph.relations_of(&key("posts", "a")).unwrap();
        // Only c is indirect (b is direct, a is self).
        assert_eq!(a.indirect.len(), 1);
        assert_eq!(a.indirect[0].target, key("posts", "c"));
    }

    #[test]
    fn dangling_targets_can_surface_but_do_not_expand() {
        let source = MemorySource::new().with_collection(
            "posts",
            vec![
                RawRecord::new("a", json!({"next": "posts/b"})),
                RawRecord::new("b", json!({"next": "posts/ghost"})),
            ],
        );
        let graph = build_graph(&source, &options(3)).unwrap();

        let a = graph.relations_of(&key("posts", "a")).unwrap();
        assert_eq!(a.indirect.len(), 1);
        assert_eq!(a.indirect[0].target, key("posts", "ghost"));
        assert_eq!(a.indirect[0].depth, 2);
    }

    #[test]
    fn hierarchy_edges_are_not_traversed() {
        // parent links exist but carry no reference edges.
        let source = MemorySource::new().with_collection(
            "posts",
            vec![
                RawRecord::new("root", json!({})),
                RawRecord::new("child", json!({"parent": "root"})),
            ],
        );
        let graph = build_graph(&source, &options(3)).unwrap();
        let child = graph.relations_of(&key("posts", "child")).unwrap();
        assert!(child.indirect.is_empty());
    }

    #[test]
    fn disabled_by_default() {
        let graph = build_graph(&chain_source(), &BuildOptions::default()).unwrap();
        let post = graph.relations_of(&key("posts", "a")).unwrap();
        assert!(post.indirect.is_empty());
    }
}
