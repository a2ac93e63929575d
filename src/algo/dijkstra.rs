//! Dijkstra's single-source single-target shortest path (§4.6).

use indexmap::{IndexMap, IndexSet};

use crate::model::{WeightedEdge, Node, node_id_set};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortestPathReport {
    pub path: Vec<String>,
    pub total_cost: f64,
}

/// Classic Dijkstra over non-negative edge weights. Distances are
/// initialized to `+inf`, source to `0`; at each step the unvisited node
/// with minimum distance is finalized, and the search stops early once the
/// target is finalized. An unreachable target returns `+inf` cost and an
/// empty path.
pub fn graph_dijkstra(nodes: &[Node], edges: &[WeightedEdge], source: &str, target: &str) -> ShortestPathReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    if !node_ids.contains(source) || !node_ids.contains(target) {
        return ShortestPathReport {
            path: Vec::new(),
            total_cost: f64::INFINITY,
        };
    }

    let mut forward: IndexMap<String, Vec<(String, f64)>> = node_ids.iter().map(|id| (id.clone(), Vec::new())).collect();
    for e in edges {
        if !node_ids.contains(&e.from) || !node_ids.contains(&e.to) {
            continue;
        }
        forward.get_mut(&e.from).unwrap().push((e.to.clone(), e.weight));
    }

    let mut dist: IndexMap<String, f64> = node_ids.iter().map(|id| (id.clone(), f64::INFINITY)).collect();
    let mut prev: IndexMap<String, String> = IndexMap::new();
    let mut visited: IndexSet<String> = IndexSet::new();
    dist.insert(source.to_string(), 0.0);

    loop {
        let current = dist
            .iter()
            .filter(|(id, _)| !visited.contains(id.as_str()))
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(id, d)| (id.clone(), *d));

        let Some((current_id, current_dist)) = current else {
            break;
        };
        if current_dist.is_infinite() {
            break;
        }
        visited.insert(current_id.clone());
        if current_id == target {
            break;
        }

        for (neighbor, weight) in &forward[&current_id] {
            if visited.contains(neighbor) {
                continue;
            }
            let candidate = current_dist + weight;
            if candidate < dist[neighbor] {
                dist.insert(neighbor.clone(), candidate);
                prev.insert(neighbor.clone(), current_id.clone());
            }
        }
    }

    let total_cost = dist[target];
    if total_cost.is_infinite() {
        return ShortestPathReport {
            path: Vec::new(),
            total_cost,
        };
    }

    let mut path = vec![target.to_string()];
    let mut cursor = target.to_string();
    while let Some(p) = prev.get(&cursor) {
        path.push(p.clone());
        cursor = p.clone();
    }
    path.reverse();

    ShortestPathReport { path, total_cost }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str, weight: f64) -> WeightedEdge {
        WeightedEdge {
            from: from.into(),
            to: to.into(),
            edge_type: "r".into(),
            weight,
        }
    }

    #[test]
    fn picks_the_cheaper_route() {
        let nodes = vec![
            Node::new("A", "t"),
            Node::new("B", "t"),
            Node::new("C", "t"),
            Node::new("D", "t"),
        ];
        let edges = vec![
            edge("A", "B", 1.0),
            edge("B", "D", 1.0),
            edge("A", "C", 1.0),
            edge("C", "D", 5.0),
        ];
        let report = graph_dijkstra(&nodes, &edges, "A", "D");
        assert_eq!(report.path, vec!["A", "B", "D"]);
        assert!((report.total_cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unreachable_target_returns_infinity() {
        let nodes = vec![Node::new("A", "t"), Node::new("B", "t")];
        let report = graph_dijkstra(&nodes, &[], "A", "B");
        assert!(report.total_cost.is_infinite());
        assert!(report.path.is_empty());
    }

    #[test]
    fn every_edge_on_path_satisfies_the_relaxation_invariant() {
        let nodes = vec![Node::new("A", "t"), Node::new("B", "t"), Node::new("C", "t")];
        let edges = vec![edge("A", "B", 3.0), edge("B", "C", 4.0)];
        let report = graph_dijkstra(&nodes, &edges, "A", "C");
        let weight_of = |from: &str, to: &str| edges.iter().find(|e| e.from == from && e.to == to).unwrap().weight;
        let mut acc = 0.0;
        for pair in report.path.windows(2) {
            acc += weight_of(&pair[0], &pair[1]);
        }
        assert!((acc - report.total_cost).abs() < 1e-9);
    }
}
