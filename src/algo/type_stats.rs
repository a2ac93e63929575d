//! Type-based statistical aggregation: the type-quotient graph, overall
//! type statistics, BFS-derived path statistics, and missing-transition
//! analysis (§4.9).

use indexmap::{IndexMap, IndexSet};

use crate::algo::traversal::graph_bfs;
use crate::model::{Adjacency, Edge, Node, node_id_set};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeTransition {
    pub from_type: String,
    pub to_type: String,
    pub edge_type: String,
    pub transition_count: u64,
    pub transition_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeAggregateNodes {
    pub node_types: Vec<String>,
    pub counts: IndexMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeAggregationReport {
    pub aggregate_nodes: TypeAggregateNodes,
    pub aggregate_edges: Vec<TypeTransition>,
}

/// Builds the type-quotient graph: participating node types plus
/// `(from_type, edge_type, to_type)`-keyed transition counts and
/// probabilities. Orphaned types (no participating edge) are excluded.
/// Edges are ordered `(from_type, edge_type, to_type)` lexicographically.
pub fn graph_type_aggregation(nodes: &[Node], edges: &[Edge]) -> TypeAggregationReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();

    let mut counts: IndexMap<(String, String, String), u64> = IndexMap::new();
    let mut outgoing_total: IndexMap<String, u64> = IndexMap::new();
    let mut participating: IndexSet<String> = IndexSet::new();

    for e in edges {
        if !node_ids.contains(&e.from) || !node_ids.contains(&e.to) {
            continue;
        }
        let from_type = type_of[e.from.as_str()].to_string();
        let to_type = type_of[e.to.as_str()].to_string();
        participating.insert(from_type.clone());
        participating.insert(to_type.clone());
        *counts.entry((from_type.clone(), to_type.clone(), e.edge_type.clone())).or_insert(0) += 1;
        *outgoing_total.entry(from_type).or_insert(0) += 1;
    }

    let mut aggregate_edges: Vec<TypeTransition> = counts
        .into_iter()
        .map(|((from_type, to_type, edge_type), count)| {
            let total = outgoing_total[&from_type] as f64;
            TypeTransition {
                transition_probability: count as f64 / total,
                from_type,
                to_type,
                edge_type,
                transition_count: count,
            }
        })
        .collect();
    aggregate_edges.sort_by(|a, b| (&a.from_type, &a.edge_type, &a.to_type).cmp(&(&b.from_type, &b.edge_type, &b.to_type)));

    let mut node_type_counts: IndexMap<String, u64> = IndexMap::new();
    for t in participating.iter() {
        let count = nodes.iter().filter(|n| &n.node_type == t).count() as u64;
        node_type_counts.insert(t.clone(), count);
    }

    TypeAggregationReport {
        aggregate_nodes: TypeAggregateNodes {
            node_types: participating.into_iter().collect(),
            counts: node_type_counts,
        },
        aggregate_edges,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeStatisticsReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub unique_node_types: Vec<String>,
    pub source_types: IndexSet<String>,
    pub target_types: IndexSet<String>,
    pub type_aggregation: TypeAggregationReport,
}

fn source_and_target_types(nodes: &[Node], edges: &[Edge]) -> (IndexSet<String>, IndexSet<String>) {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let has_incoming: IndexSet<&str> = nodes
        .iter()
        .filter(|n| !adjacency.predecessors(&n.id).is_empty())
        .map(|n| n.node_type.as_str())
        .collect();
    let has_outgoing: IndexSet<&str> = nodes
        .iter()
        .filter(|n| !adjacency.neighbors(&n.id).is_empty())
        .map(|n| n.node_type.as_str())
        .collect();
    let all_types: IndexSet<&str> = nodes.iter().map(|n| n.node_type.as_str()).collect();

    let source_types = all_types
        .iter()
        .filter(|t| !has_incoming.contains(*t))
        .map(|t| t.to_string())
        .collect();
    let target_types = all_types
        .iter()
        .filter(|t| !has_outgoing.contains(*t))
        .map(|t| t.to_string())
        .collect();
    (source_types, target_types)
}

/// Aggregate record over node/edge types: counts, full type list (including
/// orphans), source/target types, and the type-quotient graph.
pub fn graph_type_statistics(nodes: &[Node], edges: &[Edge]) -> TypeStatisticsReport {
    let unique_node_types: IndexSet<String> = nodes.iter().map(|n| n.node_type.clone()).collect();
    let (source_types, target_types) = source_and_target_types(nodes, edges);

    TypeStatisticsReport {
        node_count: nodes.len(),
        edge_count: edges.len(),
        unique_node_types: unique_node_types.into_iter().collect(),
        source_types,
        target_types,
        type_aggregation: graph_type_aggregation(nodes, edges),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStatisticsReport {
    pub longest_depth: u64,
    pub total_reachable_nodes: usize,
    pub branching_factor: f64,
    pub deepest_type_sequence: Vec<String>,
}

/// BFS from every node whose type has no incoming edges ("source types");
/// reports the deepest depth reached across all such runs, the union of
/// all reachable nodes, the global branching factor (`|E| / |V|`), and the
/// node-type sequence along the traversal that reached the max depth.
pub fn graph_path_statistics(nodes: &[Node], edges: &[Edge]) -> PathStatisticsReport {
    let (source_types, _) = source_and_target_types(nodes, edges);
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();

    let mut longest_depth = 0u64;
    let mut deepest_type_sequence: Vec<String> = Vec::new();
    let mut reachable: IndexSet<String> = IndexSet::new();

    for node in nodes.iter().filter(|n| source_types.contains(&n.node_type)) {
        let steps = graph_bfs(nodes, edges, &node.id);
        for step in &steps {
            reachable.insert(step.id.clone());
        }
        if let Some(deepest) = steps.iter().max_by_key(|s| s.depth) {
            if deepest.depth >= longest_depth {
                longest_depth = deepest.depth;
                let mut sequence = vec![deepest.id.clone()];
                let mut cursor = deepest.parent_id.clone();
                while let Some(p) = cursor {
                    sequence.push(p.clone());
                    cursor = steps.iter().find(|s| s.id == p).and_then(|s| s.parent_id.clone());
                }
                sequence.reverse();
                deepest_type_sequence = sequence
                    .iter()
                    .map(|id| type_of.get(id.as_str()).copied().unwrap_or("").to_string())
                    .collect();
            }
        }
    }

    let branching_factor = if nodes.is_empty() { 0.0 } else { edges.len() as f64 / nodes.len() as f64 };

    PathStatisticsReport {
        longest_depth,
        total_reachable_nodes: reachable.len(),
        branching_factor,
        deepest_type_sequence,
    }
}

/// Returns the subset of `expected` `(from_type, to_type)` pairs not
/// realized by any valid edge.
pub fn graph_missing_transitions(nodes: &[Node], edges: &[Edge], expected: &[(String, String)]) -> Vec<(String, String)> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();

    let realized: IndexSet<(String, String)> = edges
        .iter()
        .filter(|e| node_ids.contains(&e.from) && node_ids.contains(&e.to))
        .map(|e| (type_of[e.from.as_str()].to_string(), type_of[e.to.as_str()].to_string()))
        .collect();

    expected
        .iter()
        .filter(|pair| !realized.contains(*pair))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_aggregation_scenario_5() {
        let nodes = vec![
            Node::new("A", "op1"),
            Node::new("B", "op2"),
            Node::new("C", "op1"),
            Node::new("D", "op3"),
        ];
        let edges = vec![
            Edge::new("A", "B", "process"),
            Edge::new("A", "C", "process"),
            Edge::new("C", "B", "process"),
        ];
        let report = graph_type_aggregation(&nodes, &edges);
        assert_eq!(report.aggregate_nodes.counts["op1"], 2);
        assert_eq!(report.aggregate_nodes.counts["op2"], 1);
        assert!(!report.aggregate_nodes.counts.contains_key("op3"));

        let op1_op1 = report
            .aggregate_edges
            .iter()
            .find(|t| t.from_type == "op1" && t.to_type == "op1")
            .unwrap();
        assert_eq!(op1_op1.transition_count, 1);
        assert!((op1_op1.transition_probability - 1.0 / 3.0).abs() < 1e-9);

        let op1_op2 = report
            .aggregate_edges
            .iter()
            .find(|t| t.from_type == "op1" && t.to_type == "op2")
            .unwrap();
        assert_eq!(op1_op2.transition_count, 2);
        assert!((op1_op2.transition_probability - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn transition_probabilities_sum_to_one_per_type() {
        let nodes = vec![Node::new("A", "x"), Node::new("B", "y"), Node::new("C", "z")];
        let edges = vec![Edge::new("A", "B", "r"), Edge::new("A", "C", "r")];
        let report = graph_type_aggregation(&nodes, &edges);
        let sum: f64 = report
            .aggregate_edges
            .iter()
            .filter(|t| t.from_type == "x")
            .map(|t| t.transition_probability)
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_transitions_scenario_8() {
        let nodes = vec![Node::new("A", "input"), Node::new("B", "process")];
        let edges = vec![Edge::new("A", "B", "r")];
        let expected = vec![
            ("input".to_string(), "process".to_string()),
            ("process".to_string(), "output".to_string()),
        ];
        let missing = graph_missing_transitions(&nodes, &edges, &expected);
        assert_eq!(missing, vec![("process".to_string(), "output".to_string())]);
    }
}
