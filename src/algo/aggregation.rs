//! Hierarchical value aggregation: bottom-up rollup, top-down distribution,
//! their temporal-duration variants, and group (per-key) rollup (§4.8).
//!
//! All four kernels emit one record per *input* node, in input order, and
//! share the same discovery-order convention as the plain traversal kernels
//! in [`crate::algo::traversal`]: children are visited last-child-first
//! (LIFO), so a node's contributor list always starts with itself followed
//! by its descendants/ancestors in that same discipline.

use indexmap::{IndexMap, IndexSet};

use crate::algo::toposort::graph_topological_sort;
use crate::model::{Adjacency, GroupValueNode, Node, TemporalNode, ValueNode, duration_minutes, node_id_set};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueAggregate {
    pub node_id: String,
    pub aggregated_value: f64,
    pub contributing_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAggregate {
    pub node_id: String,
    pub aggregated_value: IndexMap<String, f64>,
    pub contributing_nodes: Vec<String>,
}

/// Visits the closure `{node} ∪ descendants(node)` in the same
/// last-child-first discovery order as [`crate::algo::traversal::graph_dfs`].
fn descendant_closure_in_discovery_order(adjacency: &Adjacency, source: &str) -> Vec<String> {
    let mut visited: IndexSet<String> = IndexSet::new();
    let mut order = Vec::new();
    let mut stack = vec![source.to_string()];
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        order.push(id.clone());
        for neighbor in adjacency.neighbors(&id) {
            if !visited.contains(neighbor) {
                stack.push(neighbor.clone());
            }
        }
    }
    order
}

/// For each input node, sums its value plus the value of every descendant
/// (transitive). Cycles are handled by the visited set: a node is included
/// at most once even if reachable via multiple routes.
pub fn graph_bottom_up_rollup(nodes: &[ValueNode], edges: &[crate::model::Edge]) -> Vec<ValueAggregate> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let value_of: IndexMap<&str, f64> = nodes.iter().map(|n| (n.id.as_str(), n.value)).collect();

    nodes
        .iter()
        .map(|n| {
            let contributing_nodes = descendant_closure_in_discovery_order(&adjacency, &n.id);
            let aggregated_value = contributing_nodes.iter().map(|id| value_of.get(id.as_str()).copied().unwrap_or(0.0)).sum();
            ValueAggregate {
                node_id: n.id.clone(),
                aggregated_value,
                contributing_nodes,
            }
        })
        .collect()
}

/// Temporal variant of [`graph_bottom_up_rollup`]: the per-node value is
/// `duration_in_minutes(start_time, end_time)`.
pub fn graph_temporal_bottom_up(nodes: &[TemporalNode], edges: &[crate::model::Edge]) -> Vec<ValueAggregate> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let duration_of: IndexMap<&str, f64> = nodes
        .iter()
        .map(|n| (n.id.as_str(), duration_minutes(n.start_time, n.end_time)))
        .collect();

    nodes
        .iter()
        .map(|n| {
            let contributing_nodes = descendant_closure_in_discovery_order(&adjacency, &n.id);
            let aggregated_value = contributing_nodes
                .iter()
                .map(|id| duration_of.get(id.as_str()).copied().unwrap_or(0.0))
                .sum();
            ValueAggregate {
                node_id: n.id.clone(),
                aggregated_value,
                contributing_nodes,
            }
        })
        .collect()
}

/// Same topology as [`graph_bottom_up_rollup`] but the per-node value is a
/// `key -> real` mapping; each key is summed independently and a missing
/// key defaults to 0.
pub fn graph_group_rollup(nodes: &[GroupValueNode], edges: &[crate::model::Edge]) -> Vec<GroupAggregate> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let value_of: IndexMap<&str, &IndexMap<String, f64>> = nodes.iter().map(|n| (n.id.as_str(), &n.value)).collect();

    nodes
        .iter()
        .map(|n| {
            let contributing_nodes = descendant_closure_in_discovery_order(&adjacency, &n.id);
            let mut aggregated_value: IndexMap<String, f64> = IndexMap::new();
            for id in &contributing_nodes {
                if let Some(values) = value_of.get(id.as_str()) {
                    for (key, v) in values.iter() {
                        *aggregated_value.entry(key.clone()).or_insert(0.0) += v;
                    }
                }
            }
            GroupAggregate {
                node_id: n.id.clone(),
                aggregated_value,
                contributing_nodes,
            }
        })
        .collect()
}

/// Distributes value top-down from roots (nodes with no predecessor).
/// A non-root receives its own value plus, from *each* parent,
/// `parent_accumulated_value / fanout(parent)`; this is additive across
/// parents with no deduplication (diamond shapes double-count by design —
/// see the open question this pins down in the design notes).
pub fn graph_top_down_rollup(nodes: &[ValueNode], edges: &[crate::model::Edge]) -> Vec<ValueAggregate> {
    let plain: Vec<Node> = nodes.iter().map(|n| Node::new(n.id.clone(), n.node_type.clone())).collect();
    let topo = graph_topological_sort(&plain, edges);

    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let value_of: IndexMap<&str, f64> = nodes.iter().map(|n| (n.id.as_str(), n.value)).collect();

    let mut accumulated: IndexMap<String, f64> = IndexMap::new();
    let mut contributors: IndexMap<String, IndexSet<String>> = IndexMap::new();

    let order: Vec<String> = if topo.has_cycle {
        // No valid topological order; fall back to input order so every
        // node still gets a record (each treated as its own root).
        nodes.iter().map(|n| n.id.clone()).collect()
    } else {
        topo.order.iter().map(|s| s.id.clone()).collect()
    };

    for id in &order {
        let predecessors = adjacency.predecessors(id);
        let own_value = value_of.get(id.as_str()).copied().unwrap_or(0.0);
        if predecessors.is_empty() {
            accumulated.insert(id.clone(), own_value);
            let mut set = IndexSet::new();
            set.insert(id.clone());
            contributors.insert(id.clone(), set);
            continue;
        }

        let mut total = own_value;
        let mut contributing: IndexSet<String> = IndexSet::new();
        contributing.insert(id.clone());
        for parent in predecessors {
            let fanout = adjacency.neighbors(parent).len().max(1) as f64;
            total += accumulated.get(parent).copied().unwrap_or(0.0) / fanout;
            if let Some(parent_contributors) = contributors.get(parent) {
                for c in parent_contributors {
                    contributing.insert(c.clone());
                }
            }
        }
        accumulated.insert(id.clone(), total);
        contributors.insert(id.clone(), contributing);
    }

    nodes
        .iter()
        .map(|n| ValueAggregate {
            node_id: n.id.clone(),
            aggregated_value: accumulated.get(&n.id).copied().unwrap_or(0.0),
            contributing_nodes: contributors.get(&n.id).map(|s| s.iter().cloned().collect()).unwrap_or_default(),
        })
        .collect()
}

/// Temporal variant of [`graph_top_down_rollup`]: distributes durations
/// rather than arbitrary values.
pub fn graph_temporal_top_down(nodes: &[TemporalNode], edges: &[crate::model::Edge]) -> Vec<ValueAggregate> {
    let as_value_nodes: Vec<ValueNode> = nodes
        .iter()
        .map(|n| ValueNode {
            id: n.id.clone(),
            node_type: n.node_type.clone(),
            value: duration_minutes(n.start_time, n.end_time),
        })
        .collect();
    graph_top_down_rollup(&as_value_nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn value_node(id: &str, value: f64) -> ValueNode {
        ValueNode {
            id: id.into(),
            node_type: "t".into(),
            value,
        }
    }

    #[test]
    fn bottom_up_scenario_1() {
        let nodes = vec![value_node("A", 10.0), value_node("B", 5.0), value_node("C", 3.0)];
        let edges = vec![Edge::new("A", "B", "r"), Edge::new("A", "C", "r")];
        let report = graph_bottom_up_rollup(&nodes, &edges);
        let a = report.iter().find(|r| r.node_id == "A").unwrap();
        assert!((a.aggregated_value - 18.0).abs() < 1e-9);
        assert_eq!(a.contributing_nodes, vec!["A", "C", "B"]);
        let b = report.iter().find(|r| r.node_id == "B").unwrap();
        assert!((b.aggregated_value - 5.0).abs() < 1e-9);
        assert_eq!(b.contributing_nodes, vec!["B"]);
    }

    #[test]
    fn top_down_scenario_2() {
        let nodes = vec![value_node("A", 10.0), value_node("B", 2.0), value_node("C", 3.0)];
        let edges = vec![Edge::new("A", "B", "r"), Edge::new("A", "C", "r")];
        let report = graph_top_down_rollup(&nodes, &edges);
        let a = report.iter().find(|r| r.node_id == "A").unwrap();
        assert!((a.aggregated_value - 10.0).abs() < 1e-9);
        assert_eq!(a.contributing_nodes, vec!["A"]);
        let b = report.iter().find(|r| r.node_id == "B").unwrap();
        assert!((b.aggregated_value - 7.0).abs() < 1e-9);
        assert_eq!(b.contributing_nodes, vec!["B", "A"]);
        let c = report.iter().find(|r| r.node_id == "C").unwrap();
        assert!((c.aggregated_value - 8.0).abs() < 1e-9);
    }

    #[test]
    fn temporal_bottom_up_scenario_3() {
        let nodes = vec![
            TemporalNode { id: "A".into(), node_type: "t".into(), start_time: 0, end_time: 10 * 60_000 },
            TemporalNode { id: "B".into(), node_type: "t".into(), start_time: 60 * 60_000, end_time: 80 * 60_000 },
            TemporalNode { id: "C".into(), node_type: "t".into(), start_time: 120 * 60_000, end_time: 150 * 60_000 },
        ];
        let edges = vec![Edge::new("A", "B", "r"), Edge::new("A", "C", "r")];
        let report = graph_temporal_bottom_up(&nodes, &edges);
        let a = report.iter().find(|r| r.node_id == "A").unwrap();
        assert!((a.aggregated_value - 60.0).abs() < 1e-9);
        assert_eq!(a.contributing_nodes, vec!["A", "C", "B"]);
        let b = report.iter().find(|r| r.node_id == "B").unwrap();
        assert!((b.aggregated_value - 20.0).abs() < 1e-9);
        let c = report.iter().find(|r| r.node_id == "C").unwrap();
        assert!((c.aggregated_value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn group_rollup_sums_keys_independently() {
        let mut a_values = IndexMap::new();
        a_values.insert("x".to_string(), 1.0);
        let mut b_values = IndexMap::new();
        b_values.insert("x".to_string(), 2.0);
        b_values.insert("y".to_string(), 5.0);
        let nodes = vec![
            GroupValueNode { id: "A".into(), node_type: "t".into(), value: a_values },
            GroupValueNode { id: "B".into(), node_type: "t".into(), value: b_values },
        ];
        let edges = vec![Edge::new("A", "B", "r")];
        let report = graph_group_rollup(&nodes, &edges);
        let a = report.iter().find(|r| r.node_id == "A").unwrap();
        assert!((a.aggregated_value["x"] - 3.0).abs() < 1e-9);
        assert!((a.aggregated_value["y"] - 5.0).abs() < 1e-9);
    }
}
