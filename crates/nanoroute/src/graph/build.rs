//! Graph construction from a cyclic neighbour order or from oriented faces.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::RouteError;

use super::{Graph, HalfEdgeId, VertexId};

impl Graph {
    /// Build a graph from an explicit cyclic neighbour order per vertex.
    ///
    /// `order[v]` lists the neighbours of `v` in the cyclic order of the
    /// embedding. The relation must be symmetric; self-loops and parallel
    /// edges are rejected. Edge ids follow the first appearance of each
    /// neighbour pair when scanning vertices in id order.
    pub fn from_neighbor_order(order: Vec<Vec<usize>>) -> Result<Self, RouteError> {
        let n = order.len();
        let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();
        let mut seen_from: Vec<u8> = Vec::new();
        let mut edges = Vec::new();
        for (v, nbrs) in order.iter().enumerate() {
            for (k, &u) in nbrs.iter().enumerate() {
                if u >= n {
                    return Err(RouteError::invalid_graph(format!(
                        "vertex {v} lists neighbour {u} but the graph has {n} vertices"
                    )));
                }
                if u == v {
                    return Err(RouteError::invalid_graph(format!("self-loop at vertex {v}")));
                }
                if nbrs[..k].contains(&u) {
                    return Err(RouteError::invalid_graph(format!(
                        "parallel edges between vertices {v} and {u}"
                    )));
                }
                let key = (v.min(u), v.max(u));
                let idx = *edge_index.entry(key).or_insert_with(|| {
                    edges.push([VertexId(key.0), VertexId(key.1)]);
                    seen_from.push(0);
                    edges.len() - 1
                });
                seen_from[idx] += 1;
            }
        }
        if let Some(idx) = seen_from.iter().position(|&c| c != 2) {
            let [a, b] = edges[idx];
            return Err(RouteError::invalid_graph(format!(
                "neighbour relation is not symmetric for vertices {} and {}",
                a.0, b.0
            )));
        }

        let mut hedge_vertex = Vec::with_capacity(2 * edges.len());
        for &[a, b] in &edges {
            hedge_vertex.push(a);
            hedge_vertex.push(b);
        }
        let native = order
            .iter()
            .enumerate()
            .map(|(v, nbrs)| {
                nbrs.iter()
                    .map(|&u| {
                        let e = edge_index[&(v.min(u), v.max(u))];
                        // Lower endpoint anchors the even half-edge.
                        if v < u {
                            HalfEdgeId(2 * e)
                        } else {
                            HalfEdgeId(2 * e + 1)
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(Self {
            edges,
            hedge_vertex,
            native,
        })
    }

    /// Build a graph from an oriented polygon mesh.
    ///
    /// The cyclic order around each vertex follows its face fan: a face
    /// `… p → v → q …` links neighbour `p` to neighbour `q` at `v`. Boundary
    /// vertices start from a neighbour without a predecessor; neighbours the
    /// fan walk does not reach (non-manifold vertices) are appended in id order.
    pub fn from_faces(n_vertices: usize, faces: &[Vec<usize>]) -> Result<Self, RouteError> {
        let mut fan: Vec<BTreeMap<usize, usize>> = vec![BTreeMap::new(); n_vertices];
        let mut nbrs: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n_vertices];
        for (fi, face) in faces.iter().enumerate() {
            let k = face.len();
            if k < 3 {
                return Err(RouteError::invalid_graph(format!(
                    "face {fi} has {k} vertices; at least 3 required"
                )));
            }
            for (i, &v) in face.iter().enumerate() {
                if v >= n_vertices {
                    return Err(RouteError::invalid_graph(format!(
                        "face {fi} references vertex {v} but the mesh has {n_vertices} vertices"
                    )));
                }
                if face[..i].contains(&v) {
                    return Err(RouteError::invalid_graph(format!(
                        "face {fi} visits vertex {v} twice"
                    )));
                }
            }
            for i in 0..k {
                let p = face[(i + k - 1) % k];
                let v = face[i];
                let q = face[(i + 1) % k];
                if fan[v].insert(p, q).is_some() {
                    return Err(RouteError::invalid_graph(format!(
                        "directed edge {p} -> {v} appears in more than one face"
                    )));
                }
                nbrs[v].insert(p);
                nbrs[v].insert(q);
            }
        }

        let order = (0..n_vertices)
            .map(|v| fan_order(&fan[v], &nbrs[v]))
            .collect();
        Self::from_neighbor_order(order)
    }
}

/// Cyclic neighbour order around one vertex from its `prev -> next` fan links.
fn fan_order(links: &BTreeMap<usize, usize>, nbrs: &BTreeSet<usize>) -> Vec<usize> {
    let has_pred: BTreeSet<usize> = links.values().copied().collect();
    let mut starts: Vec<usize> = nbrs.iter().copied().filter(|u| !has_pred.contains(u)).collect();
    starts.extend(nbrs.iter().copied().filter(|u| has_pred.contains(u)));

    let mut out = Vec::with_capacity(nbrs.len());
    let mut placed = BTreeSet::new();
    for s in starts {
        let mut cur = s;
        while placed.insert(cur) {
            out.push(cur);
            match links.get(&cur) {
                Some(&next) => cur = next,
                None => break,
            }
        }
    }
    out
}
