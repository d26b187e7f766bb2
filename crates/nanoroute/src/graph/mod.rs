//! Embedded graph: vertices, edges and half-edges in an integer arena.
//!
//! Purpose
//! - Hold the connectivity and the cyclic half-edge order around every vertex
//!   (the native embedding derived from the input mesh). Routing never mutates
//!   it; every routing structure is a side table indexed by these ids.
//!
//! Layout
//! - Edge `e` owns half-edges `2e` and `2e + 1`. Half-edge `2e` is anchored at
//!   the first endpoint of `e`, `2e + 1` at the second, so the twin of `h` is
//!   `h ^ 1` and its edge is `h / 2`.
//! - `hedge_vertex[h]` is the tail (anchor) vertex of `h`.
//! - `native[v]` lists the half-edges anchored at `v` in cyclic order.
//!
//! Construction lives in `build.rs` (`from_neighbor_order`, `from_faces`).

mod build;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfEdgeId(pub usize);

#[derive(Clone, Debug)]
pub struct Graph {
    edges: Vec<[VertexId; 2]>,
    hedge_vertex: Vec<VertexId>,
    native: Vec<Vec<HalfEdgeId>>,
}

impl Graph {
    pub fn vertex_count(&self) -> usize {
        self.native.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.hedge_vertex.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.native.len()).map(VertexId)
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn all_half_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.hedge_vertex.len()).map(HalfEdgeId)
    }

    /// Half-edges anchored at `v`, in the cyclic order of the input embedding.
    pub fn native_order(&self, v: VertexId) -> &[HalfEdgeId] {
        &self.native[v.0]
    }

    /// Edges incident to `v`, in native order.
    pub fn adjacent_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.native[v.0].iter().map(|&h| self.edge(h))
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.native[v.0].len()
    }

    pub fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        let [a, b] = self.edges[e.0];
        (a, b)
    }

    /// The endpoint of `e` that is not `v`; `None` if `v` is not on `e`.
    pub fn other_vertex(&self, e: EdgeId, v: VertexId) -> Option<VertexId> {
        let [a, b] = self.edges[e.0];
        if a == v {
            Some(b)
        } else if b == v {
            Some(a)
        } else {
            None
        }
    }

    /// Vertex shared by two distinct edges, if any.
    pub fn common_vertex(&self, e: EdgeId, f: EdgeId) -> Option<VertexId> {
        if e == f {
            return None;
        }
        let [a, b] = self.edges[e.0];
        let [c, d] = self.edges[f.0];
        if a == c || a == d {
            Some(a)
        } else if b == c || b == d {
            Some(b)
        } else {
            None
        }
    }

    /// Half-edge of `e` anchored at `v` (leaving `v`).
    pub fn outward_half_edge(&self, e: EdgeId, v: VertexId) -> Option<HalfEdgeId> {
        let [a, b] = self.edges[e.0];
        if a == v {
            Some(HalfEdgeId(2 * e.0))
        } else if b == v {
            Some(HalfEdgeId(2 * e.0 + 1))
        } else {
            None
        }
    }

    pub fn half_edges(&self, e: EdgeId) -> (HalfEdgeId, HalfEdgeId) {
        (HalfEdgeId(2 * e.0), HalfEdgeId(2 * e.0 + 1))
    }

    #[inline]
    pub fn twin(&self, h: HalfEdgeId) -> HalfEdgeId {
        HalfEdgeId(h.0 ^ 1)
    }

    /// Tail vertex of `h`.
    #[inline]
    pub fn vertex(&self, h: HalfEdgeId) -> VertexId {
        self.hedge_vertex[h.0]
    }

    /// Head vertex of `h` (the tail of its twin).
    #[inline]
    pub fn head(&self, h: HalfEdgeId) -> VertexId {
        self.hedge_vertex[h.0 ^ 1]
    }

    #[inline]
    pub fn edge(&self, h: HalfEdgeId) -> EdgeId {
        EdgeId(h.0 / 2)
    }

    /// Number of vertices reachable from vertex 0 (breadth-first).
    pub fn reachable_count(&self) -> usize {
        let n = self.vertex_count();
        if n == 0 {
            return 0;
        }
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([VertexId(0)]);
        seen[0] = true;
        let mut count = 1;
        while let Some(v) = queue.pop_front() {
            for &h in &self.native[v.0] {
                let w = self.head(h);
                if !seen[w.0] {
                    seen[w.0] = true;
                    count += 1;
                    queue.push_back(w);
                }
            }
        }
        count
    }

    pub fn is_connected(&self) -> bool {
        self.reachable_count() == self.vertex_count()
    }
}

#[cfg(test)]
mod tests;
