//! Co-tree partitioning: components of the non-tree edges and their pairings.
//!
//! Model
//! - Two non-tree edges are adjacent when they share a vertex; components are
//!   the connected classes of that relation.
//! - Each component is decomposed into pairs of edges meeting at a vertex by a
//!   depth-first search over the component: in post-order, the open edges at a
//!   vertex are paired two at a time and a single leftover is paired with the
//!   edge the search used to reach the vertex. Only the root can keep one edge
//!   unpaired, so a component of `k` edges yields `k / 2` pairs and `k % 2`
//!   unpaired edges.

use std::collections::HashMap;

use crate::graph::{EdgeId, Graph, VertexId};

use super::tree::SpanningTree;

/// Maximal set of non-tree edges connected through shared vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoTreeComponent {
    /// Ascending edge ids.
    pub edges: Vec<EdgeId>,
}

/// Two edges meeting at a vertex, or one edge left unpaired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgePairing {
    pub first: EdgeId,
    pub second: Option<EdgeId>,
}

impl EdgePairing {
    pub fn is_pair(&self) -> bool {
        self.second.is_some()
    }
}

/// Components of the co-tree together with the pairing of each.
#[derive(Clone, Debug, Default)]
pub struct Partition {
    pub components: Vec<CoTreeComponent>,
    /// `pairings[i]` belongs to `components[i]`.
    pub pairings: Vec<Vec<EdgePairing>>,
}

impl Partition {
    pub fn iter_pairings(&self) -> impl Iterator<Item = &EdgePairing> + '_ {
        self.pairings.iter().flatten()
    }

    pub fn pair_count(&self) -> usize {
        self.iter_pairings().filter(|p| p.is_pair()).count()
    }

    pub fn unpaired_count(&self) -> usize {
        self.iter_pairings().filter(|p| !p.is_pair()).count()
    }
}

/// Flood-fill the non-tree edges into components, ordered by smallest edge id.
pub fn components(graph: &Graph, tree: &SpanningTree) -> Vec<CoTreeComponent> {
    let m = graph.edge_count();
    let mut assigned = vec![false; m];
    let mut out = Vec::new();
    for seed in graph.edges() {
        if tree.contains(seed) || assigned[seed.0] {
            continue;
        }
        assigned[seed.0] = true;
        let mut edges = vec![seed];
        let mut stack = vec![seed];
        while let Some(e) = stack.pop() {
            let (a, b) = graph.endpoints(e);
            for v in [a, b] {
                for f in graph.adjacent_edges(v) {
                    if !tree.contains(f) && !assigned[f.0] {
                        assigned[f.0] = true;
                        edges.push(f);
                        stack.push(f);
                    }
                }
            }
        }
        edges.sort_unstable();
        out.push(CoTreeComponent { edges });
    }
    out
}

/// Decompose one component into edge pairs sharing a vertex.
pub fn pair_component(graph: &Graph, component: &CoTreeComponent) -> Vec<EdgePairing> {
    let Some(&first) = component.edges.first() else {
        return Vec::new();
    };
    if component.edges.len() == 1 {
        return vec![EdgePairing {
            first,
            second: None,
        }];
    }

    // Component-local adjacency, in edge id order.
    let mut local: HashMap<VertexId, Vec<EdgeId>> = HashMap::new();
    for &e in &component.edges {
        let (a, b) = graph.endpoints(e);
        local.entry(a).or_default().push(e);
        local.entry(b).or_default().push(e);
    }

    let mut classified: HashMap<EdgeId, bool> = HashMap::with_capacity(component.edges.len());
    let mut parent_edge: HashMap<VertexId, Option<EdgeId>> = HashMap::new();
    let mut open: HashMap<VertexId, Vec<EdgeId>> = HashMap::new();
    let mut pairings = Vec::with_capacity(component.edges.len() / 2 + 1);

    let (a, b) = graph.endpoints(first);
    let root = a.min(b);
    parent_edge.insert(root, None);
    // Frames: (vertex, index of the next local edge to inspect).
    let mut stack: Vec<(VertexId, usize)> = vec![(root, 0)];
    while let Some(frame) = stack.last_mut() {
        let (v, idx) = *frame;
        let incident = &local[&v];
        if idx < incident.len() {
            frame.1 += 1;
            let e = incident[idx];
            if classified.contains_key(&e) {
                continue;
            }
            let Some(w) = graph.other_vertex(e, v) else {
                continue;
            };
            if parent_edge.contains_key(&w) {
                // Surplus edge: its other end is an open ancestor, so it is
                // settled at `v`, which finishes first.
                classified.insert(e, false);
                open.entry(v).or_default().push(e);
            } else {
                classified.insert(e, true);
                parent_edge.insert(w, Some(e));
                stack.push((w, 0));
            }
            continue;
        }

        stack.pop();
        let pending = open.remove(&v).unwrap_or_default();
        let mut chunks = pending.chunks_exact(2);
        for pair in &mut chunks {
            pairings.push(EdgePairing {
                first: pair[0],
                second: Some(pair[1]),
            });
        }
        let leftover = chunks.remainder().first().copied();
        match (leftover, parent_edge[&v]) {
            (Some(l), Some(p)) => pairings.push(EdgePairing {
                first: p,
                second: Some(l),
            }),
            (Some(l), None) => pairings.push(EdgePairing {
                first: l,
                second: None,
            }),
            (None, Some(p)) => {
                if let Some(u) = graph.other_vertex(p, v) {
                    open.entry(u).or_default().push(p);
                }
            }
            (None, None) => {}
        }
    }
    pairings
}

/// All components of the co-tree and their pairings.
pub fn partition(graph: &Graph, tree: &SpanningTree) -> Partition {
    let components = components(graph, tree);
    let pairings = components
        .iter()
        .map(|c| pair_component(graph, c))
        .collect();
    Partition {
        components,
        pairings,
    }
}
