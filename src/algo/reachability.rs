//! Ancestor/descendant closure and dynamic (filtered) reachability (§4.5).

use indexmap::IndexSet;

use crate::model::{Adjacency, DynamicEdge, Node, node_id_set};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachabilityReport {
    pub node_id: String,
    pub ancestors: Vec<String>,
    pub descendants: Vec<String>,
    pub reachable_nodes: Vec<String>,
}

fn closure(adjacency: &Adjacency, source: &str, forward: bool) -> Vec<String> {
    let mut visited: IndexSet<String> = IndexSet::new();
    let mut stack = vec![source.to_string()];
    while let Some(id) = stack.pop() {
        let neighbors = if forward {
            adjacency.neighbors(&id)
        } else {
            adjacency.predecessors(&id)
        };
        for n in neighbors {
            if visited.insert(n.clone()) {
                stack.push(n.clone());
            }
        }
    }
    visited.into_iter().collect()
}

/// For every input node, computes the set of ids reaching it (ancestors,
/// via reverse adjacency) and reachable from it (descendants, via forward
/// adjacency); `reachable_nodes` is their union.
pub fn graph_ancestors_descendants(nodes: &[Node], edges: &[crate::model::Edge]) -> Vec<ReachabilityReport> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    nodes
        .iter()
        .map(|n| {
            let ancestors = closure(&adjacency, &n.id, false);
            let descendants = closure(&adjacency, &n.id, true);
            let mut reachable: IndexSet<String> = ancestors.iter().cloned().collect();
            reachable.extend(descendants.iter().cloned());
            ReachabilityReport {
                node_id: n.id.clone(),
                ancestors,
                descendants,
                reachable_nodes: reachable.into_iter().collect(),
            }
        })
        .collect()
}

/// Same as [`graph_ancestors_descendants`] but restricted to the subgraph
/// of edges with `active == true`.
pub fn graph_dynamic_reachability(nodes: &[Node], edges: &[DynamicEdge]) -> Vec<ReachabilityReport> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let active_edges: Vec<&DynamicEdge> = edges.iter().filter(|e| e.active).collect();
    let adjacency = Adjacency::build(
        &node_ids,
        active_edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    nodes
        .iter()
        .map(|n| {
            let ancestors = closure(&adjacency, &n.id, false);
            let descendants = closure(&adjacency, &n.id, true);
            let mut reachable: IndexSet<String> = ancestors.iter().cloned().collect();
            reachable.extend(descendants.iter().cloned());
            ReachabilityReport {
                node_id: n.id.clone(),
                ancestors,
                descendants,
                reachable_nodes: reachable.into_iter().collect(),
            }
        })
        .collect()
}
