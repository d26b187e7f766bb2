//! Small reference meshes and random embedded graphs.
//!
//! The polyhedra use outward counter-clockwise faces, so their native
//! embeddings are the usual spherical ones. `random_graph` draws connected
//! graphs with an arbitrary (generally non-planar) rotation for stress tests
//! and benches.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::RouteError;
use crate::graph::Graph;

/// Named meshes as `(vertex count, faces)`.
pub fn tetrahedron_faces() -> (usize, Vec<Vec<usize>>) {
    (
        4,
        vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]],
    )
}

pub fn octahedron_faces() -> (usize, Vec<Vec<usize>>) {
    (
        6,
        vec![
            vec![0, 1, 2],
            vec![0, 2, 3],
            vec![0, 3, 4],
            vec![0, 4, 1],
            vec![5, 2, 1],
            vec![5, 3, 2],
            vec![5, 4, 3],
            vec![5, 1, 4],
        ],
    )
}

/// Prism over an `n`-gon: bottom ring `0..n`, top ring `n..2n`.
pub fn prism_faces(n: usize) -> (usize, Vec<Vec<usize>>) {
    let mut faces = Vec::with_capacity(n + 2);
    faces.push((0..n).rev().collect());
    faces.push((n..2 * n).collect());
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(vec![i, j, n + j, n + i]);
    }
    (2 * n, faces)
}

pub fn tetrahedron() -> Graph {
    let (n, faces) = tetrahedron_faces();
    from_known_faces(n, &faces)
}

pub fn octahedron() -> Graph {
    let (n, faces) = octahedron_faces();
    from_known_faces(n, &faces)
}

pub fn cube() -> Graph {
    prism(4)
}

pub fn prism(n: usize) -> Graph {
    let (nv, faces) = prism_faces(n.max(3));
    from_known_faces(nv, &faces)
}

/// A single triangle (open surface).
pub fn triangle() -> Graph {
    from_known_faces(3, &[vec![0, 1, 2]])
}

/// Two triangles sharing vertex 0.
pub fn bowtie() -> Graph {
    from_known_faces(5, &[vec![0, 1, 2], vec![0, 3, 4]])
}

fn from_known_faces(n: usize, faces: &[Vec<usize>]) -> Graph {
    match Graph::from_faces(n, faces) {
        Ok(g) => g,
        Err(e) => unreachable!("built-in mesh is well formed: {e}"),
    }
}

/// Random connected simple graph with `n` vertices and up to `extra` edges
/// beyond a random tree, with a shuffled cyclic order at every vertex.
pub fn random_graph(seed: u64, n: usize, extra: usize) -> Result<Graph, RouteError> {
    if n < 2 {
        return Err(RouteError::invalid_graph("random graph needs at least 2 vertices"));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pairs = BTreeSet::new();
    for v in 1..n {
        let u = rng.gen_range(0..v);
        pairs.insert((u, v));
    }
    let max_edges = n * (n - 1) / 2;
    let target = (pairs.len() + extra).min(max_edges);
    while pairs.len() < target {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            pairs.insert((a.min(b), a.max(b)));
        }
    }
    let mut order = vec![Vec::new(); n];
    for &(a, b) in &pairs {
        order[a].push(b);
        order[b].push(a);
    }
    for nbrs in &mut order {
        nbrs.shuffle(&mut rng);
    }
    Graph::from_neighbor_order(order)
}
