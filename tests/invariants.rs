//! Property-based checks of the universal invariants (§8) over randomly
//! generated small graphs.

use graphkit::{Edge, Node, graph_bfs, graph_connected_components, graph_dijkstra, graph_strongly_connected_components, graph_topological_sort, WeightedEdge};
use proptest::prelude::*;

fn node_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("n{i}")).collect()
}

fn arb_small_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    (2usize..8).prop_flat_map(|n| {
        let ids = node_ids(n);
        let nodes: Vec<Node> = ids.iter().map(|id| Node::new(id.clone(), "t")).collect();
        let possible_edges: Vec<(usize, usize)> = (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).filter(|(i, j)| i != j).collect();
        prop::collection::vec(prop::sample::select(possible_edges), 0..12).prop_map(move |pairs| {
            let edges = pairs.iter().map(|&(i, j)| Edge::new(ids[i].clone(), ids[j].clone(), "r")).collect();
            (nodes.clone(), edges)
        })
    })
}

proptest! {
    #[test]
    fn bfs_is_deterministic_and_depth_adjacent((nodes, edges) in arb_small_graph()) {
        let source = nodes[0].id.clone();
        let first = graph_bfs(&nodes, &edges, &source);
        let second = graph_bfs(&nodes, &edges, &source);
        prop_assert_eq!(&first, &second);

        let root = first.iter().find(|s| s.id == source).unwrap();
        prop_assert_eq!(root.depth, 0);

        for step in &first {
            if let Some(parent_id) = &step.parent_id {
                let parent_depth = first.iter().find(|s| &s.id == parent_id).unwrap().depth;
                prop_assert_eq!(step.depth, parent_depth + 1);
            }
        }
        // Directed-BFS shortest-path property: depth(v) is the length of the
        // shortest path to v, so it can never exceed depth(u) + 1 for any
        // edge u -> v; it may be much smaller (e.g. a back edge in a cycle).
        for edge in &edges {
            let from_depth = first.iter().find(|s| s.id == edge.from).map(|s| s.depth);
            let to_depth = first.iter().find(|s| s.id == edge.to).map(|s| s.depth);
            if let (Some(fd), Some(td)) = (from_depth, to_depth) {
                prop_assert!(td <= fd + 1);
            }
        }
    }

    #[test]
    fn topological_order_matches_edges_iff_acyclic((nodes, edges) in arb_small_graph()) {
        let report = graph_topological_sort(&nodes, &edges);
        if !report.has_cycle {
            for edge in &edges {
                let from_order = report.order.iter().find(|s| s.id == edge.from).unwrap().topo_order;
                let to_order = report.order.iter().find(|s| s.id == edge.to).unwrap().topo_order;
                prop_assert!(from_order < to_order);
            }
        }
    }

    #[test]
    fn every_node_belongs_to_exactly_one_scc((nodes, edges) in arb_small_graph()) {
        let sccs = graph_strongly_connected_components(&nodes, &edges);
        let mut seen = std::collections::HashSet::new();
        for scc in &sccs {
            for id in scc {
                prop_assert!(seen.insert(id.clone()), "node {} appeared in more than one SCC", id);
            }
        }
        prop_assert_eq!(seen.len(), nodes.len());
    }

    #[test]
    fn connected_components_partition_every_node((nodes, edges) in arb_small_graph()) {
        let report = graph_connected_components(&nodes, &edges);
        let mut seen = std::collections::HashSet::new();
        for component in &report.components {
            for id in &component.nodes {
                prop_assert!(seen.insert(id.clone()));
            }
        }
        prop_assert_eq!(seen.len(), nodes.len());
    }

    #[test]
    fn dijkstra_path_satisfies_edge_relaxation((nodes, edges) in arb_small_graph()) {
        let weighted: Vec<WeightedEdge> = edges.iter().map(|e| WeightedEdge {
            from: e.from.clone(),
            to: e.to.clone(),
            edge_type: e.edge_type.clone(),
            weight: 1.0,
        }).collect();
        let source = nodes[0].id.clone();
        let target = nodes[nodes.len() - 1].id.clone();
        let report = graph_dijkstra(&nodes, &weighted, &source, &target);
        if report.total_cost.is_finite() {
            let mut acc = 0.0;
            for pair in report.path.windows(2) {
                let w = weighted.iter().find(|e| e.from == pair[0] && e.to == pair[1]).unwrap().weight;
                acc += w;
            }
            prop_assert!((acc - report.total_cost).abs() < 1e-6);
        }
    }
}
