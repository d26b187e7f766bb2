//! Curated surface for downstream builders (cylinder/strand models, persistence).
//!
//! Consumers need three artifacts: the spanning tree (which junctions are
//! covalent), the kissing-loop half-edges (where the strand breaks), and the
//! trail (the strand path, walked once in order).

// Graph model
pub use crate::graph::{EdgeId, Graph, HalfEdgeId, VertexId};
// Routing entry points
pub use crate::routing::{
    check_preconditions, route, route_saved, route_with_tree, RouteCfg, RouteStats, Routing,
    TreeStrategy,
};
// Artifacts
pub use crate::routing::{KissingLoopSet, SavedTree, SpanningTree, Trail};
// Stage-level access for inspection and tests
pub use crate::routing::{
    build_rotation, extract_trail, greedy_degree, partition, randomized_tree, trail_step,
    EdgePairing, Partition, RotationSystem,
};
