//! Trail extraction: one walk over a completed rotation system.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::graph::{Graph, HalfEdgeId, VertexId};

use super::rotation::{KissingLoopSet, RotationSystem};

/// Closed sequence of half-edges, each half-edge of the graph exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    hedges: Vec<HalfEdgeId>,
}

/// Successor of `h` along the strand.
///
/// An ordinary half-edge arrives at its head and continues after its twin; a
/// kissing-loop half-edge does not cross its edge and continues after itself
/// at its own tail.
pub fn step(
    graph: &Graph,
    rotation: &RotationSystem,
    kissing: &KissingLoopSet,
    h: HalfEdgeId,
) -> Result<HalfEdgeId, RouteError> {
    if kissing.contains(h) {
        rotation.next_after(graph.vertex(h), h)
    } else {
        rotation.next_after(graph.head(h), graph.twin(h))
    }
}

/// Walk from `start` until the walk returns to it.
pub fn extract(
    graph: &Graph,
    rotation: &RotationSystem,
    kissing: &KissingLoopSet,
    start: HalfEdgeId,
) -> Result<Trail, RouteError> {
    let expected = graph.half_edge_count();
    let mut hedges = Vec::with_capacity(expected);
    let mut cur = start;
    loop {
        if hedges.len() == expected {
            return Err(RouteError::TrailNotClosed {
                start,
                steps: expected,
            });
        }
        hedges.push(cur);
        cur = step(graph, rotation, kissing, cur)?;
        if cur == start {
            break;
        }
    }
    if hedges.len() != expected {
        return Err(RouteError::TrailSplit {
            start,
            len: hedges.len(),
            expected,
        });
    }
    Ok(Trail { hedges })
}

impl Trail {
    pub fn as_slice(&self) -> &[HalfEdgeId] {
        &self.hedges
    }

    pub fn len(&self) -> usize {
        self.hedges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hedges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.hedges.iter().copied()
    }

    /// Tail vertex of every half-edge, in strand order.
    pub fn vertices(&self, graph: &Graph) -> Vec<VertexId> {
        self.hedges.iter().map(|&h| graph.vertex(h)).collect()
    }

    /// Stepping from the last entry reproduces the first.
    pub fn is_closed(
        &self,
        graph: &Graph,
        rotation: &RotationSystem,
        kissing: &KissingLoopSet,
    ) -> bool {
        match (self.hedges.first(), self.hedges.last()) {
            (Some(&first), Some(&last)) => {
                matches!(step(graph, rotation, kissing, last), Ok(h) if h == first)
            }
            _ => false,
        }
    }

    /// Every half-edge of `graph` appears exactly once.
    pub fn covers(&self, graph: &Graph) -> bool {
        if self.hedges.len() != graph.half_edge_count() {
            return false;
        }
        let mut seen = vec![false; graph.half_edge_count()];
        for &h in &self.hedges {
            if h.0 >= seen.len() || seen[h.0] {
                return false;
            }
            seen[h.0] = true;
        }
        true
    }

    /// Same cyclic sequence up to rotation, or reversed.
    pub fn is_cyclic_equivalent(&self, other: &Trail) -> bool {
        let n = self.hedges.len();
        if n != other.hedges.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let Some(k) = other.hedges.iter().position(|&h| h == self.hedges[0]) else {
            return false;
        };
        let forward = (0..n).all(|i| self.hedges[i] == other.hedges[(k + i) % n]);
        let backward = (0..n).all(|i| self.hedges[i] == other.hedges[(k + n - i) % n]);
        forward || backward
    }
}
