//! Error type shared by every routing stage.
//!
//! Two families live here. Precondition failures describe bad input and are
//! reported before any attempt starts. Inconsistencies describe a broken
//! internal invariant (a bug in partitioning or splicing) and abort the attempt.

use std::fmt;

use crate::graph::{EdgeId, HalfEdgeId, VertexId};

#[derive(Debug)]
pub enum RouteError {
    /// The graph has no edges to route.
    EmptyGraph,
    /// Not every vertex is reachable from the first one.
    Disconnected { reached: usize, total: usize },
    /// The input adjacency or mesh cannot be turned into a simple embedded graph.
    InvalidGraph { reason: String },
    /// A supplied edge set is not a spanning tree of the graph.
    InvalidTree { reason: String },
    /// Search parameters out of range.
    InvalidConfig { reason: String },
    /// A half-edge was inserted twice into a rotation list.
    DuplicateHalfEdge {
        vertex: VertexId,
        half_edge: HalfEdgeId,
    },
    /// A half-edge is absent from the rotation list that should hold it.
    MissingHalfEdge {
        vertex: VertexId,
        half_edge: HalfEdgeId,
    },
    /// Two paired edges do not meet at a vertex.
    PairWithoutCommonVertex { first: EdgeId, second: EdgeId },
    /// The trail walk did not come back to its start within the step bound.
    TrailNotClosed { start: HalfEdgeId, steps: usize },
    /// The trail walk closed before visiting every half-edge.
    TrailSplit {
        start: HalfEdgeId,
        len: usize,
        expected: usize,
    },
    /// Failure inside one randomized trial; `seed` replays it.
    Trial {
        index: usize,
        seed: u64,
        source: Box<RouteError>,
    },
}

impl RouteError {
    pub(crate) fn invalid_graph(reason: impl Into<String>) -> Self {
        Self::InvalidGraph {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_tree(reason: impl Into<String>) -> Self {
        Self::InvalidTree {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// True for errors that indicate a routing bug rather than bad input.
    pub fn is_inconsistency(&self) -> bool {
        match self {
            Self::DuplicateHalfEdge { .. }
            | Self::MissingHalfEdge { .. }
            | Self::PairWithoutCommonVertex { .. }
            | Self::TrailNotClosed { .. }
            | Self::TrailSplit { .. } => true,
            Self::Trial { source, .. } => source.is_inconsistency(),
            _ => false,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGraph => write!(f, "graph has no edges"),
            Self::Disconnected { reached, total } => {
                write!(f, "graph is disconnected: reached {reached} of {total} vertices")
            }
            Self::InvalidGraph { reason } => write!(f, "invalid graph: {reason}"),
            Self::InvalidTree { reason } => write!(f, "invalid spanning tree: {reason}"),
            Self::InvalidConfig { reason } => write!(f, "invalid routing config: {reason}"),
            Self::DuplicateHalfEdge { vertex, half_edge } => write!(
                f,
                "half-edge {} inserted twice into rotation of vertex {}",
                half_edge.0, vertex.0
            ),
            Self::MissingHalfEdge { vertex, half_edge } => write!(
                f,
                "half-edge {} missing from rotation of vertex {}",
                half_edge.0, vertex.0
            ),
            Self::PairWithoutCommonVertex { first, second } => write!(
                f,
                "paired edges {} and {} share no vertex",
                first.0, second.0
            ),
            Self::TrailNotClosed { start, steps } => write!(
                f,
                "trail from half-edge {} did not close within {steps} steps",
                start.0
            ),
            Self::TrailSplit {
                start,
                len,
                expected,
            } => write!(
                f,
                "trail from half-edge {} closed after {len} of {expected} half-edges",
                start.0
            ),
            Self::Trial {
                index,
                seed,
                source,
            } => write!(f, "trial {index} (seed {seed:#018x}): {source}"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Trial { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
