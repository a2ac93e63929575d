//! Kahn's algorithm: topological order with layers, and cycle detection
//! with a witness node (§4.4).

use indexmap::IndexMap;

use crate::model::{Adjacency, Node, node_id_set};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopoStep {
    pub id: String,
    pub topo_order: u64,
    pub layer: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopologicalSortReport {
    pub order: Vec<TopoStep>,
    pub has_cycle: bool,
    pub cycle_nodes: Vec<String>,
}

/// Runs Kahn's algorithm. `layer` increments every time the current
/// ready-frontier is exhausted, i.e. it groups nodes into parallel-ready
/// batches. If fewer than `|V|` nodes are emitted, `has_cycle` is set and
/// `cycle_nodes` names a node still with positive in-degree plus one of its
/// predecessors that can reach back to it.
pub fn graph_topological_sort(nodes: &[Node], edges: &[crate::model::Edge]) -> TopologicalSortReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    let mut in_degree: IndexMap<String, usize> = nodes
        .iter()
        .map(|n| (n.id.clone(), adjacency.predecessors(&n.id).len()))
        .collect();

    let mut frontier: Vec<String> = nodes
        .iter()
        .filter(|n| in_degree[&n.id] == 0)
        .map(|n| n.id.clone())
        .collect();

    let mut order = Vec::new();
    let mut topo_order: u64 = 0;
    let mut layer: u64 = 0;

    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();
        for id in &frontier {
            order.push(TopoStep {
                id: id.clone(),
                topo_order,
                layer,
            });
            topo_order += 1;
            for neighbor in adjacency.neighbors(id) {
                let degree = in_degree.get_mut(neighbor).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    next_frontier.push(neighbor.clone());
                }
            }
        }
        frontier = next_frontier;
        layer += 1;
    }

    if order.len() < nodes.len() {
        let witness = nodes
            .iter()
            .map(|n| n.id.clone())
            .find(|id| in_degree.get(id).copied().unwrap_or(0) > 0);
        let mut cycle_nodes = Vec::new();
        if let Some(w) = witness {
            cycle_nodes.push(w.clone());
            if let Some(pred) = adjacency
                .predecessors(&w)
                .iter()
                .find(|p| in_degree.get(*p).copied().unwrap_or(0) > 0)
            {
                cycle_nodes.push(pred.clone());
            }
        }
        return TopologicalSortReport {
            order,
            has_cycle: true,
            cycle_nodes,
        };
    }

    TopologicalSortReport {
        order,
        has_cycle: false,
        cycle_nodes: Vec::new(),
    }
}
