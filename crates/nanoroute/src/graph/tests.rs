use super::*;
use crate::error::RouteError;
use crate::shapes;

fn neighbors(g: &Graph, v: usize) -> Vec<usize> {
    g.native_order(VertexId(v))
        .iter()
        .map(|&h| g.head(h).0)
        .collect()
}

#[test]
fn tetrahedron_counts_and_degrees() {
    let g = shapes::tetrahedron();
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 6);
    assert_eq!(g.half_edge_count(), 12);
    for v in g.vertices() {
        assert_eq!(g.degree(v), 3);
    }
    assert!(g.is_connected());
}

#[test]
fn face_fan_gives_cyclic_neighbor_order() {
    let g = shapes::tetrahedron();
    // Faces 012, 031, 023 around vertex 0 link 2->1, 1->3, 3->2.
    assert_eq!(neighbors(&g, 0), vec![1, 3, 2]);
    assert_eq!(neighbors(&g, 3), vec![0, 1, 2]);
}

#[test]
fn boundary_vertex_starts_at_open_side() {
    let g = shapes::triangle();
    assert_eq!(neighbors(&g, 0), vec![2, 1]);
    let b = shapes::bowtie();
    assert_eq!(neighbors(&b, 0), vec![2, 1, 4, 3]);
}

#[test]
fn half_edge_relations() {
    let g = shapes::cube();
    for h in g.all_half_edges() {
        let t = g.twin(h);
        assert_ne!(h, t);
        assert_eq!(g.twin(t), h);
        assert_eq!(g.edge(h), g.edge(t));
        assert_eq!(g.head(h), g.vertex(t));
        assert!(g.native_order(g.vertex(h)).contains(&h));
    }
    for e in g.edges() {
        let (a, b) = g.endpoints(e);
        assert_eq!(g.other_vertex(e, a), Some(b));
        assert_eq!(g.outward_half_edge(e, a).map(|h| g.vertex(h)), Some(a));
        assert_eq!(g.outward_half_edge(e, b).map(|h| g.vertex(h)), Some(b));
        let (h0, h1) = g.half_edges(e);
        assert_eq!(g.twin(h0), h1);
    }
}

#[test]
fn common_vertex_of_adjacent_and_disjoint_edges() {
    let g = Graph::from_neighbor_order(vec![vec![1, 2], vec![0, 2], vec![1, 0, 3], vec![2]])
        .unwrap();
    let find = |a: usize, b: usize| {
        g.edges()
            .find(|&e| {
                let (x, y) = g.endpoints(e);
                (x.0, y.0) == (a.min(b), a.max(b))
            })
            .unwrap()
    };
    assert_eq!(g.common_vertex(find(0, 1), find(1, 2)), Some(VertexId(1)));
    assert_eq!(g.common_vertex(find(0, 1), find(2, 3)), None);
    assert_eq!(g.common_vertex(find(0, 1), find(0, 1)), None);
}

#[test]
fn neighbor_order_rejects_bad_input() {
    let asym = Graph::from_neighbor_order(vec![vec![1], vec![]]);
    assert!(matches!(asym, Err(RouteError::InvalidGraph { .. })));
    let self_loop = Graph::from_neighbor_order(vec![vec![0]]);
    assert!(matches!(self_loop, Err(RouteError::InvalidGraph { .. })));
    let parallel = Graph::from_neighbor_order(vec![vec![1, 1], vec![0, 0]]);
    assert!(matches!(parallel, Err(RouteError::InvalidGraph { .. })));
    let range = Graph::from_neighbor_order(vec![vec![5]]);
    assert!(matches!(range, Err(RouteError::InvalidGraph { .. })));
}

#[test]
fn faces_reject_bad_input() {
    let short = Graph::from_faces(3, &[vec![0, 1]]);
    assert!(matches!(short, Err(RouteError::InvalidGraph { .. })));
    let flipped = Graph::from_faces(3, &[vec![0, 1, 2], vec![0, 1, 2]]);
    assert!(matches!(flipped, Err(RouteError::InvalidGraph { .. })));
    let range = Graph::from_faces(3, &[vec![0, 1, 7]]);
    assert!(matches!(range, Err(RouteError::InvalidGraph { .. })));
}

#[test]
fn disconnected_graph_is_detected() {
    let g = Graph::from_neighbor_order(vec![vec![1], vec![0], vec![3], vec![2]]).unwrap();
    assert_eq!(g.reachable_count(), 2);
    assert!(!g.is_connected());
}

#[test]
fn random_graph_is_connected_and_simple() {
    for seed in 0..20 {
        let g = shapes::random_graph(seed, 12, 10).unwrap();
        assert!(g.is_connected());
        assert_eq!(g.vertex_count(), 12);
        assert!(g.edge_count() >= 11);
    }
}
