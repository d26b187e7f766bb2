//! Spanning tree selection (greedy-degree and randomized growth) and its
//! persistence form.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::graph::{EdgeId, Graph, HalfEdgeId, VertexId};

/// Edge subset that connects every vertex without cycles.
///
/// Edges are kept sorted by id so that the saved form and everything derived
/// from the tree are independent of the order the tree was grown in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanningTree {
    member: Vec<bool>,
    edges: Vec<EdgeId>,
}

/// Serializable edge-id list of a spanning tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTree {
    pub edges: Vec<usize>,
}

impl SpanningTree {
    /// Validate `edges` against `graph` and build the tree.
    pub fn from_edges(
        graph: &Graph,
        edges: impl IntoIterator<Item = EdgeId>,
    ) -> Result<Self, RouteError> {
        let n = graph.vertex_count();
        let m = graph.edge_count();
        let mut member = vec![false; m];
        let mut list = Vec::new();
        for e in edges {
            if e.0 >= m {
                return Err(RouteError::invalid_tree(format!(
                    "edge {} out of range ({m} edges)",
                    e.0
                )));
            }
            if member[e.0] {
                return Err(RouteError::invalid_tree(format!("edge {} listed twice", e.0)));
            }
            member[e.0] = true;
            list.push(e);
        }
        if n == 0 {
            return Err(RouteError::EmptyGraph);
        }
        if list.len() != n - 1 {
            return Err(RouteError::invalid_tree(format!(
                "{} edges given, a spanning tree of {n} vertices has {}",
                list.len(),
                n - 1
            )));
        }
        // n - 1 edges without a cycle connect all n vertices.
        let mut sets = DisjointSets::new(n);
        for &e in &list {
            let (a, b) = graph.endpoints(e);
            if !sets.union(a.0, b.0) {
                return Err(RouteError::invalid_tree(format!(
                    "edge {} closes a cycle",
                    e.0
                )));
            }
        }
        list.sort_unstable();
        Ok(Self {
            member,
            edges: list,
        })
    }

    pub fn contains(&self, e: EdgeId) -> bool {
        self.member.get(e.0).copied().unwrap_or(false)
    }

    /// Tree edges in ascending id order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Where trail extraction starts: the first half-edge of the lowest tree edge.
    pub fn first_half_edge(&self, graph: &Graph) -> Option<HalfEdgeId> {
        self.edges.first().map(|&e| graph.half_edges(e).0)
    }

    pub fn save(&self) -> SavedTree {
        SavedTree {
            edges: self.edges.iter().map(|e| e.0).collect(),
        }
    }

    pub fn load(graph: &Graph, saved: &SavedTree) -> Result<Self, RouteError> {
        Self::from_edges(graph, saved.edges.iter().map(|&e| EdgeId(e)))
    }
}

/// Deterministic growth from the highest-degree vertex, always extending to
/// the frontier vertex of highest degree (earliest discovered on ties).
pub fn greedy_degree(graph: &Graph) -> Result<SpanningTree, RouteError> {
    let n = graph.vertex_count();
    let Some(root) = graph
        .vertices()
        .max_by_key(|&v| (graph.degree(v), Reverse(v.0)))
    else {
        return Err(RouteError::EmptyGraph);
    };
    let mut visited = vec![false; n];
    let mut reached = 1;
    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    let mut frontier = Frontier::default();
    visited[root.0] = true;
    frontier.push_incident(graph, root, &visited);
    while let Some((_, _, e, w)) = frontier.heap.pop() {
        if visited[w.0] {
            continue;
        }
        visited[w.0] = true;
        reached += 1;
        tree.push(e);
        frontier.push_incident(graph, w, &visited);
    }
    if reached < n {
        return Err(RouteError::Disconnected { reached, total: n });
    }
    SpanningTree::from_edges(graph, tree)
}

/// Randomized growth: start at a random vertex and draw the next frontier edge
/// uniformly; an edge joins the tree exactly when it reaches a new vertex.
pub fn randomized<R: Rng>(graph: &Graph, rng: &mut R) -> Result<SpanningTree, RouteError> {
    let n = graph.vertex_count();
    if n == 0 {
        return Err(RouteError::EmptyGraph);
    }
    let root = VertexId(rng.gen_range(0..n));
    let mut visited = vec![false; n];
    visited[root.0] = true;
    let mut reached = 1;
    let mut tree = Vec::with_capacity(n - 1);
    let mut frontier: Vec<(EdgeId, VertexId)> = graph
        .adjacent_edges(root)
        .filter_map(|e| graph.other_vertex(e, root).map(|w| (e, w)))
        .collect();
    while !frontier.is_empty() {
        let k = rng.gen_range(0..frontier.len());
        let (e, w) = frontier.swap_remove(k);
        if visited[w.0] {
            continue;
        }
        visited[w.0] = true;
        reached += 1;
        tree.push(e);
        frontier.extend(
            graph
                .adjacent_edges(w)
                .filter_map(|f| graph.other_vertex(f, w).map(|x| (f, x)))
                .filter(|&(_, x)| !visited[x.0]),
        );
    }
    if reached < n {
        return Err(RouteError::Disconnected { reached, total: n });
    }
    SpanningTree::from_edges(graph, tree)
}

/// Candidate edges keyed by far-endpoint degree, then discovery order.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<(usize, Reverse<usize>, EdgeId, VertexId)>,
    seq: usize,
}

impl Frontier {
    fn push_incident(&mut self, graph: &Graph, v: VertexId, visited: &[bool]) {
        for e in graph.adjacent_edges(v) {
            if let Some(w) = graph.other_vertex(e, v) {
                if !visited[w.0] {
                    self.heap.push((graph.degree(w), Reverse(self.seq), e, w));
                    self.seq += 1;
                }
            }
        }
    }
}

/// Union-find with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if they were already one set.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}
