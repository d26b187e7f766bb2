//! Rotation system construction: tree skeleton, pair splicing, kissing loops.
//!
//! Model
//! - A rotation system stores, per vertex, a cyclic list of half-edges. The
//!   boundary walk steps from `h` to the entry after `twin(h)` in the rotation
//!   of `head(h)`; its orbits are the faces of the embedding.
//! - The tree half-edges in native order form a single orbit. Adding one edge
//!   of a pair inside that orbit splits it in two; the second edge must then
//!   join a corner of each part, which restores a single orbit. `would_bisect`
//!   tells which part the corner at the far vertex belongs to.
//! - Whatever is still unplaced after splicing is appended as a kissing-loop
//!   half-edge. Kissing-loop half-edges turn the walk back at their own vertex,
//!   so they extend an orbit without splitting it.

use crate::error::RouteError;
use crate::graph::{EdgeId, Graph, HalfEdgeId, VertexId};

use super::cotree::{EdgePairing, Partition};
use super::tree::SpanningTree;

/// Per-vertex cyclic half-edge lists plus a placed-bitset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationSystem {
    lists: Vec<Vec<HalfEdgeId>>,
    placed: Vec<bool>,
}

/// Half-edges where the strand continues only through a kissing loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KissingLoopSet {
    member: Vec<bool>,
    count: usize,
}

impl KissingLoopSet {
    pub fn new(half_edge_count: usize) -> Self {
        Self {
            member: vec![false; half_edge_count],
            count: 0,
        }
    }

    pub fn insert(&mut self, h: HalfEdgeId) -> bool {
        if self.member[h.0] {
            return false;
        }
        self.member[h.0] = true;
        self.count += 1;
        true
    }

    pub fn contains(&self, h: HalfEdgeId) -> bool {
        self.member.get(h.0).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.member
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| HalfEdgeId(i))
    }

    /// Edges that carry kissing-loop half-edges, ascending.
    pub fn edges(&self) -> Vec<EdgeId> {
        let mut out: Vec<EdgeId> = self.iter().map(|h| EdgeId(h.0 / 2)).collect();
        out.dedup();
        out
    }
}

impl RotationSystem {
    /// Empty rotation for every vertex of `graph`.
    pub fn empty(graph: &Graph) -> Self {
        Self {
            lists: vec![Vec::new(); graph.vertex_count()],
            placed: vec![false; graph.half_edge_count()],
        }
    }

    /// Tree half-edges at each vertex, in native order.
    pub fn from_tree(graph: &Graph, tree: &SpanningTree) -> Self {
        let mut rot = Self::empty(graph);
        for v in graph.vertices() {
            for &h in graph.native_order(v) {
                if tree.contains(graph.edge(h)) {
                    rot.lists[v.0].push(h);
                    rot.placed[h.0] = true;
                }
            }
        }
        rot
    }

    /// Rotation given explicitly per vertex; every entry must sit at its own tail.
    pub fn from_lists(graph: &Graph, lists: Vec<Vec<HalfEdgeId>>) -> Result<Self, RouteError> {
        let mut rot = Self::empty(graph);
        for (v, list) in lists.into_iter().enumerate() {
            for h in list {
                if graph.vertex(h) != VertexId(v) {
                    return Err(RouteError::MissingHalfEdge {
                        vertex: graph.vertex(h),
                        half_edge: h,
                    });
                }
                rot.push(graph, h)?;
            }
        }
        Ok(rot)
    }

    pub fn rotation(&self, v: VertexId) -> &[HalfEdgeId] {
        &self.lists[v.0]
    }

    pub fn contains(&self, h: HalfEdgeId) -> bool {
        self.placed[h.0]
    }

    pub fn position(&self, v: VertexId, h: HalfEdgeId) -> Option<usize> {
        self.lists[v.0].iter().position(|&x| x == h)
    }

    fn locate(&self, v: VertexId, h: HalfEdgeId) -> Result<usize, RouteError> {
        self.position(v, h).ok_or(RouteError::MissingHalfEdge {
            vertex: v,
            half_edge: h,
        })
    }

    /// Entry after `h` in the rotation of `v`, cyclically.
    pub fn next_after(&self, v: VertexId, h: HalfEdgeId) -> Result<HalfEdgeId, RouteError> {
        let list = &self.lists[v.0];
        let i = self.locate(v, h)?;
        Ok(list[(i + 1) % list.len()])
    }

    /// Entry before `h` in the rotation of `v`, cyclically.
    pub fn prev_before(&self, v: VertexId, h: HalfEdgeId) -> Result<HalfEdgeId, RouteError> {
        let list = &self.lists[v.0];
        let i = self.locate(v, h)?;
        Ok(list[(i + list.len() - 1) % list.len()])
    }

    /// One step of the boundary walk: entry after `twin(h)` at `head(h)`.
    pub fn boundary_step(&self, graph: &Graph, h: HalfEdgeId) -> Result<HalfEdgeId, RouteError> {
        self.next_after(graph.head(h), graph.twin(h))
    }

    fn mark(&mut self, graph: &Graph, h: HalfEdgeId) -> Result<(), RouteError> {
        if self.placed[h.0] {
            return Err(RouteError::DuplicateHalfEdge {
                vertex: graph.vertex(h),
                half_edge: h,
            });
        }
        self.placed[h.0] = true;
        Ok(())
    }

    /// Append `h` to the rotation of its tail.
    pub fn push(&mut self, graph: &Graph, h: HalfEdgeId) -> Result<(), RouteError> {
        self.mark(graph, h)?;
        self.lists[graph.vertex(h).0].push(h);
        Ok(())
    }

    /// Make `h` the first entry of the rotation of its tail.
    pub fn insert_first(&mut self, graph: &Graph, h: HalfEdgeId) -> Result<(), RouteError> {
        self.mark(graph, h)?;
        self.lists[graph.vertex(h).0].insert(0, h);
        Ok(())
    }

    /// Insert `h` immediately after `anchor`; both must share a tail.
    pub fn insert_after(
        &mut self,
        graph: &Graph,
        anchor: HalfEdgeId,
        h: HalfEdgeId,
    ) -> Result<(), RouteError> {
        let v = graph.vertex(h);
        let i = self.locate(v, anchor)?;
        self.mark(graph, h)?;
        self.lists[v.0].insert(i + 1, h);
        Ok(())
    }

    /// Walk the boundary orbit of `start` and report whether `marker` lies on it.
    ///
    /// The walk stops on reaching `marker` (true) or on coming back to `start`
    /// (false). Used during splicing, when the partial rotation has exactly two
    /// orbits: a true result means `marker`'s corner is in the orbit of `start`.
    pub fn would_bisect(
        &self,
        graph: &Graph,
        start: HalfEdgeId,
        marker: HalfEdgeId,
    ) -> Result<bool, RouteError> {
        let bound = graph.half_edge_count() + 1;
        let mut cur = start;
        for _ in 0..bound {
            if cur == marker {
                return Ok(true);
            }
            cur = self.boundary_step(graph, cur)?;
            if cur == start {
                return Ok(false);
            }
        }
        Err(RouteError::TrailNotClosed {
            start,
            steps: bound,
        })
    }

    /// Splice the pair `(e1, e2)` into the rotation while keeping one orbit.
    pub fn splice_pair(&mut self, graph: &Graph, e1: EdgeId, e2: EdgeId) -> Result<(), RouteError> {
        let missing_pair = RouteError::PairWithoutCommonVertex {
            first: e1,
            second: e2,
        };
        let Some(vc) = graph.common_vertex(e1, e2) else {
            return Err(missing_pair);
        };
        let (Some(v1), Some(v2)) = (graph.other_vertex(e1, vc), graph.other_vertex(e2, vc)) else {
            return Err(missing_pair);
        };
        let (Some(h1), Some(t1), Some(h2), Some(t2)) = (
            graph.outward_half_edge(e1, v1),
            graph.outward_half_edge(e1, vc),
            graph.outward_half_edge(e2, v2),
            graph.outward_half_edge(e2, vc),
        ) else {
            return Err(missing_pair);
        };

        self.push(graph, h1)?;
        self.push(graph, t1)?;

        let Some(&marker) = self.lists[v2.0].first() else {
            return Err(RouteError::MissingHalfEdge {
                vertex: v2,
                half_edge: h2,
            });
        };
        // The corner before `marker` at v2 lies in marker's orbit. The corner
        // after t1 at vc lies in h1's orbit, the corner before t1 in t1's.
        let anchor = if self.would_bisect(graph, h1, marker)? {
            self.prev_before(vc, t1)?
        } else {
            t1
        };
        self.insert_after(graph, anchor, t2)?;
        self.insert_first(graph, h2)
    }

    /// Append every unplaced half-edge and mark it as a kissing loop.
    pub fn augment(&mut self, graph: &Graph) -> Result<KissingLoopSet, RouteError> {
        let mut kissing = KissingLoopSet::new(graph.half_edge_count());
        for h in graph.all_half_edges() {
            if !self.placed[h.0] {
                self.push(graph, h)?;
                kissing.insert(h);
            }
        }
        Ok(kissing)
    }

    /// Each rotation is a permutation of its vertex's native half-edges.
    pub fn check_complete(&self, graph: &Graph) -> Result<(), RouteError> {
        let mut seen = vec![false; graph.half_edge_count()];
        for v in graph.vertices() {
            for &h in &self.lists[v.0] {
                if graph.vertex(h) != v {
                    return Err(RouteError::MissingHalfEdge {
                        vertex: graph.vertex(h),
                        half_edge: h,
                    });
                }
                if seen[h.0] {
                    return Err(RouteError::DuplicateHalfEdge {
                        vertex: v,
                        half_edge: h,
                    });
                }
                seen[h.0] = true;
            }
        }
        match seen.iter().position(|&s| !s) {
            Some(i) => {
                let h = HalfEdgeId(i);
                Err(RouteError::MissingHalfEdge {
                    vertex: graph.vertex(h),
                    half_edge: h,
                })
            }
            None => Ok(()),
        }
    }

    pub fn is_complete(&self, graph: &Graph) -> bool {
        self.check_complete(graph).is_ok()
    }
}

/// Build the full rotation system and kissing-loop set for a tree and its
/// co-tree partition.
pub fn build(
    graph: &Graph,
    tree: &SpanningTree,
    partition: &Partition,
) -> Result<(RotationSystem, KissingLoopSet), RouteError> {
    let mut rot = RotationSystem::from_tree(graph, tree);
    for pairing in partition.iter_pairings() {
        if let EdgePairing {
            first,
            second: Some(second),
        } = *pairing
        {
            rot.splice_pair(graph, first, second)?;
        }
    }
    let kissing = rot.augment(graph)?;
    Ok((rot, kissing))
}
