//! Critical path method (CPM): forward/backward pass over a temporal DAG
//! (§4.6).

use indexmap::IndexMap;

use crate::algo::toposort::graph_topological_sort;
use crate::model::{Adjacency, TemporalNode, duration_minutes, node_id_set};

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalPathReport {
    pub path: Vec<String>,
    pub total_duration_minutes: f64,
}

/// Computes earliest-start per node in topological order (forward pass),
/// then the latest-finish from the project end (backward pass), then
/// reconstructs the critical path by following predecessors whose finish
/// equals the current node's earliest-start. Returns an empty report for a
/// cyclic input (no valid topological order exists).
pub fn graph_critical_path(nodes: &[TemporalNode], edges: &[crate::model::Edge]) -> CriticalPathReport {
    if nodes.is_empty() {
        return CriticalPathReport::default();
    }
    let plain_nodes: Vec<crate::model::Node> = nodes
        .iter()
        .map(|n| crate::model::Node::new(n.id.clone(), n.node_type.clone()))
        .collect();
    let topo = graph_topological_sort(&plain_nodes, edges);
    if topo.has_cycle {
        return CriticalPathReport::default();
    }

    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    let duration_of: IndexMap<String, f64> = nodes
        .iter()
        .map(|n| (n.id.clone(), duration_minutes(n.start_time, n.end_time)))
        .collect();

    let order: Vec<String> = topo.order.iter().map(|s| s.id.clone()).collect();

    let mut earliest_start: IndexMap<String, f64> = IndexMap::new();
    for id in &order {
        let predecessor_finish = adjacency
            .predecessors(id)
            .iter()
            .map(|p| earliest_start[p] + duration_of[p])
            .fold(0.0_f64, f64::max);
        earliest_start.insert(id.clone(), predecessor_finish);
    }

    let total_duration = order
        .iter()
        .map(|id| earliest_start[id] + duration_of[id])
        .fold(0.0_f64, f64::max);

    let mut latest_finish: IndexMap<String, f64> = IndexMap::new();
    for id in order.iter().rev() {
        let successor_min = adjacency
            .neighbors(id)
            .iter()
            .map(|s| latest_finish[s] - duration_of[s])
            .fold(f64::INFINITY, f64::min);
        let lf = if adjacency.neighbors(id).is_empty() {
            total_duration
        } else {
            successor_min
        };
        latest_finish.insert(id.clone(), lf);
    }

    // Reconstruct: start at a sink whose earliest_start + duration equals
    // total_duration, then walk backward through predecessors whose
    // finish equals the current node's earliest_start.
    let mut path = Vec::new();
    let mut current = order
        .iter()
        .rev()
        .find(|id| (earliest_start[*id] + duration_of[*id] - total_duration).abs() < 1e-9)
        .cloned();

    while let Some(id) = current {
        path.push(id.clone());
        let es = earliest_start[&id];
        current = adjacency
            .predecessors(&id)
            .iter()
            .find(|p| (earliest_start[*p] + duration_of[*p] - es).abs() < 1e-9)
            .cloned();
    }
    path.reverse();

    CriticalPathReport {
        path,
        total_duration_minutes: total_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn temporal(id: &str, start: i64, end: i64) -> TemporalNode {
        TemporalNode {
            id: id.into(),
            node_type: "task".into(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn total_duration_equals_max_sink_finish() {
        // A(10m) -> B(20m) -> D(5m); A(10m) -> C(5m) -> D(5m)
        let nodes = vec![
            temporal("A", 0, 10 * 60_000),
            temporal("B", 0, 20 * 60_000),
            temporal("C", 0, 5 * 60_000),
            temporal("D", 0, 5 * 60_000),
        ];
        let edges = vec![
            Edge::new("A", "B", "r"),
            Edge::new("A", "C", "r"),
            Edge::new("B", "D", "r"),
            Edge::new("C", "D", "r"),
        ];
        let report = graph_critical_path(&nodes, &edges);
        assert!((report.total_duration_minutes - 35.0).abs() < 1e-9);
        assert_eq!(report.path, vec!["A", "B", "D"]);
    }

    #[test]
    fn cyclic_input_returns_empty_report() {
        let nodes = vec![temporal("A", 0, 60_000), temporal("B", 0, 60_000)];
        let edges = vec![Edge::new("A", "B", "r"), Edge::new("B", "A", "r")];
        let report = graph_critical_path(&nodes, &edges);
        assert!(report.path.is_empty());
    }
}
