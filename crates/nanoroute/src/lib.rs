//! Topological routing of single-strand nucleic-acid nanostructures.
//!
//! Given an embedded graph (vertices with a cyclic half-edge order taken from
//! a polyhedral mesh), compute a spanning tree, splice the remaining edges in
//! pairs into the tree's rotation system, and read off the closed trail that
//! the strand follows. Edges that cannot be paired become kissing loops.
//!
//! Layout
//! - `graph`: half-edge arena and constructors.
//! - `routing`: the routing stages and the trial search.
//! - `shapes`: reference polyhedra and random embedded graphs.
//! - `error`: the shared `RouteError`.

pub mod api;
pub mod error;
pub mod graph;
pub mod routing;
pub mod shapes;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::RouteError;
pub use graph::{EdgeId, Graph, HalfEdgeId, VertexId};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::RouteError;
    pub use crate::graph::{EdgeId, Graph, HalfEdgeId, VertexId};
    pub use crate::routing::{
        route, route_saved, route_with_tree, KissingLoopSet, RouteCfg, Routing, SavedTree,
        SpanningTree, Trail, TreeStrategy,
    };
}
