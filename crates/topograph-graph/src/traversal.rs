//! Traversals over the topology graph.
//!
//! Every traversal here is a BFS with its own visited set, so each call
//! touches a vertex at most once and terminates on cyclic topologies.
//! Adjacent edges are always walked in insertion order, which makes the
//! output order (and the chosen shortest path) stable across calls.

use crate::graph::{EdgeId, NodeId, TopologyGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use topograph_core::Result;

/// Vertices and edges collected by one traversal.
///
/// Both lists are duplicate-free and ordered by discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    pub vertices: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Traversal {
    /// Appends another traversal, skipping vertices and edges already held.
    pub fn merge(&mut self, other: Traversal) {
        let mut seen_vertices: HashSet<NodeId> = self.vertices.iter().copied().collect();
        let mut seen_edges: HashSet<EdgeId> = self.edges.iter().copied().collect();

        for vertex in other.vertices {
            if seen_vertices.insert(vertex) {
                self.vertices.push(vertex);
            }
        }
        for edge in other.edges {
            if seen_edges.insert(edge) {
                self.edges.push(edge);
            }
        }
    }
}

impl TopologyGraph {
    /// Collects what `start` reaches in one direction.
    ///
    /// `Outgoing` follows dependencies, `Incoming` follows dependents. With
    /// `transitive` unset only the start vertex is expanded (one hop).
    /// The start vertex itself is never listed, even on a cycle back to it,
    /// but every edge leaving an expanded vertex is.
    pub fn reach(&self, start: NodeId, direction: Direction, transitive: bool) -> Result<Traversal> {
        self.vertex_at(start)?;

        let mut result = Traversal::default();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for edge_ref in self.edges_directed(current, direction) {
                result.edges.push(edge_ref.id());

                let neighbor = match direction {
                    Direction::Outgoing => edge_ref.target(),
                    Direction::Incoming => edge_ref.source(),
                };

                if visited.insert(neighbor) {
                    result.vertices.push(neighbor);
                    if transitive {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        Ok(result)
    }

    /// Direct out- and in-neighbors of `start`, out-neighbors first.
    pub fn neighbors(&self, start: NodeId) -> Result<Traversal> {
        let mut result = self.reach(start, Direction::Outgoing, false)?;
        result.merge(self.reach(start, Direction::Incoming, false)?);
        Ok(result)
    }

    /// Full transitive dependencies followed by full transitive dependents.
    pub fn lineage(&self, start: NodeId) -> Result<Traversal> {
        let mut result = self.reach(start, Direction::Outgoing, true)?;
        result.merge(self.reach(start, Direction::Incoming, true)?);
        Ok(result)
    }

    /// Finds the shortest directed path from `from` to `to`.
    ///
    /// Unweighted BFS; among equally short paths the one whose edges were
    /// inserted first wins. Returns `None` when `to` is unreachable. A path
    /// from a vertex to itself is that single vertex with no edges.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Result<Option<Traversal>> {
        self.vertex_at(from)?;
        self.vertex_at(to)?;

        if from == to {
            return Ok(Some(Traversal {
                vertices: vec![from],
                edges: Vec::new(),
            }));
        }

        // First arrival at a node records how we got there
        let mut parents: HashMap<NodeId, (NodeId, EdgeId)> = HashMap::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for edge_ref in self.edges_directed(current, Direction::Outgoing) {
                let next = edge_ref.target();
                if !visited.insert(next) {
                    continue;
                }
                parents.insert(next, (current, edge_ref.id()));

                if next == to {
                    return Ok(Some(unwind(&parents, from, to)));
                }
                queue.push_back(next);
            }
        }

        Ok(None)
    }
}

/// Rebuilds a path by following parent links back from `to`.
fn unwind(parents: &HashMap<NodeId, (NodeId, EdgeId)>, from: NodeId, to: NodeId) -> Traversal {
    let mut vertices = vec![to];
    let mut edges = Vec::new();
    let mut current = to;

    while current != from {
        match parents.get(&current) {
            Some(&(parent, edge)) => {
                edges.push(edge);
                vertices.push(parent);
                current = parent;
            }
            None => break,
        }
    }

    vertices.reverse();
    edges.reverse();
    Traversal { vertices, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use topograph_core::{Edge, GraphError, Vertex};

    fn build(vertices: &[&str], edges: &[(&str, &str)]) -> TopologyGraph {
        let mut builder = GraphBuilder::new();
        for key in vertices {
            builder.add_vertex(Vertex::new(*key, key.to_uppercase())).unwrap();
        }
        for (source, target) in edges {
            let key = format!("{source}-{target}");
            builder.add_edge(Edge::new(key, *source, *target)).unwrap();
        }
        builder.build()
    }

    fn keys(graph: &TopologyGraph, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|id| graph.vertex_at(*id).unwrap().key.clone())
            .collect()
    }

    fn edge_keys(graph: &TopologyGraph, ids: &[EdgeId]) -> Vec<String> {
        ids.iter()
            .map(|id| graph.edge_at(*id).unwrap().key.clone())
            .collect()
    }

    fn idx(graph: &TopologyGraph, key: &str) -> NodeId {
        graph.get_index(key).unwrap()
    }

    #[test]
    fn test_linear_chain() {
        // a → b → c
        let graph = build(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let a = idx(&graph, "a");
        let c = idx(&graph, "c");

        let deps = graph.reach(a, Direction::Outgoing, true).unwrap();
        assert_eq!(keys(&graph, &deps.vertices), vec!["b", "c"]);
        assert_eq!(edge_keys(&graph, &deps.edges), vec!["a-b", "b-c"]);

        let direct = graph.reach(a, Direction::Outgoing, false).unwrap();
        assert_eq!(keys(&graph, &direct.vertices), vec!["b"]);
        assert_eq!(edge_keys(&graph, &direct.edges), vec!["a-b"]);

        let dependents = graph.reach(c, Direction::Incoming, true).unwrap();
        assert_eq!(keys(&graph, &dependents.vertices), vec!["b", "a"]);
    }

    #[test]
    fn test_diamond_no_duplicates() {
        //     a
        //    / \
        //   b   c
        //    \ /
        //     d
        let graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );

        let deps = graph.reach(idx(&graph, "a"), Direction::Outgoing, true).unwrap();
        assert_eq!(keys(&graph, &deps.vertices), vec!["b", "c", "d"]);
        assert_eq!(deps.edges.len(), 4);
    }

    #[test]
    fn test_cycle_terminates() {
        // a → b → c → a
        let graph = build(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let a = idx(&graph, "a");

        let deps = graph.reach(a, Direction::Outgoing, true).unwrap();
        assert_eq!(keys(&graph, &deps.vertices), vec!["b", "c"]);
        assert_eq!(deps.edges.len(), 3);

        let dependents = graph.reach(a, Direction::Incoming, true).unwrap();
        assert_eq!(keys(&graph, &dependents.vertices), vec!["c", "b"]);

        let lineage = graph.lineage(a).unwrap();
        assert_eq!(lineage.vertices.len(), 2);
        assert_eq!(lineage.edges.len(), 3);
    }

    #[test]
    fn test_self_loop_excluded_from_vertices() {
        let graph = build(&["a", "b"], &[("a", "a"), ("a", "b")]);
        let neighbors = graph.neighbors(idx(&graph, "a")).unwrap();

        assert_eq!(keys(&graph, &neighbors.vertices), vec!["b"]);
        // the loop shows up once even though it is both in- and out-edge
        assert_eq!(edge_keys(&graph, &neighbors.edges), vec!["a-a", "a-b"]);
    }

    #[test]
    fn test_neighbors_both_directions() {
        // x → m → y, z → m
        let graph = build(&["x", "m", "y", "z"], &[("x", "m"), ("m", "y"), ("z", "m")]);
        let neighbors = graph.neighbors(idx(&graph, "m")).unwrap();

        assert_eq!(keys(&graph, &neighbors.vertices), vec!["y", "x", "z"]);
        assert_eq!(edge_keys(&graph, &neighbors.edges), vec!["m-y", "x-m", "z-m"]);
    }

    #[test]
    fn test_neighbor_on_both_sides_listed_once() {
        let graph = build(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let neighbors = graph.neighbors(idx(&graph, "a")).unwrap();

        assert_eq!(keys(&graph, &neighbors.vertices), vec!["b"]);
        assert_eq!(neighbors.edges.len(), 2);
    }

    #[test]
    fn test_shortest_path() {
        // a → b → c → d, plus shortcut a → c
        let graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("a", "c")],
        );

        let path = graph
            .shortest_path(idx(&graph, "a"), idx(&graph, "d"))
            .unwrap()
            .unwrap();
        assert_eq!(keys(&graph, &path.vertices), vec!["a", "c", "d"]);
        assert_eq!(edge_keys(&graph, &path.edges), vec!["a-c", "c-d"]);
    }

    #[test]
    fn test_shortest_path_tie_breaks_by_insertion() {
        // two equally short routes; a → b was inserted before a → c
        let graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d")],
        );

        for _ in 0..5 {
            let path = graph
                .shortest_path(idx(&graph, "a"), idx(&graph, "d"))
                .unwrap()
                .unwrap();
            assert_eq!(keys(&graph, &path.vertices), vec!["a", "b", "d"]);
        }
    }

    #[test]
    fn test_shortest_path_respects_direction() {
        let graph = build(&["a", "b"], &[("a", "b")]);
        let path = graph
            .shortest_path(idx(&graph, "b"), idx(&graph, "a"))
            .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn test_shortest_path_to_self() {
        let graph = build(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let a = idx(&graph, "a");
        let path = graph.shortest_path(a, a).unwrap().unwrap();
        assert_eq!(path.vertices, vec![a]);
        assert!(path.edges.is_empty());
    }

    #[test]
    fn test_invalid_start_is_internal() {
        let graph = build(&["a"], &[]);
        let err = graph
            .reach(NodeId::new(9), Direction::Outgoing, true)
            .unwrap_err();
        assert!(matches!(err, GraphError::Internal(_)));
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let mut left = Traversal {
            vertices: vec![NodeId::new(1), NodeId::new(2)],
            edges: vec![EdgeId::new(0)],
        };
        left.merge(Traversal {
            vertices: vec![NodeId::new(2), NodeId::new(3)],
            edges: vec![EdgeId::new(0), EdgeId::new(1)],
        });

        assert_eq!(
            left.vertices,
            vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]
        );
        assert_eq!(left.edges, vec![EdgeId::new(0), EdgeId::new(1)]);
    }
}
