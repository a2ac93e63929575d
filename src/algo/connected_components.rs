//! Connected components over the undirected view of the graph (§4.3).

use indexmap::{IndexMap, IndexSet};

use crate::model::{Adjacency, Node, node_id_set};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentAssignment {
    pub node_id: String,
    pub component_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentSummary {
    pub component_id: String,
    pub size: usize,
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectedComponentsReport {
    pub assignments: Vec<ComponentAssignment>,
    pub components: Vec<ComponentSummary>,
}

/// Builds an undirected adjacency view: every directed edge also inserts
/// its reverse, so traversal treats `(u, v)` and `(v, u)` alike.
fn undirected_adjacency(node_ids: &IndexSet<String>, edges: &[crate::model::Edge]) -> Adjacency {
    let mut doubled: Vec<(String, String, String)> = Vec::with_capacity(edges.len() * 2);
    for e in edges {
        doubled.push((e.from.clone(), e.to.clone(), e.edge_type.clone()));
        doubled.push((e.to.clone(), e.from.clone(), e.edge_type.clone()));
    }
    Adjacency::build(
        node_ids,
        doubled.iter().map(|(f, t, ty)| (f.as_str(), t.as_str(), ty.as_str())),
    )
}

/// Assigns every node a `comp_<k>` id via iterative DFS over the undirected
/// view, `k` a monotone counter in node-iteration order.
pub fn graph_connected_components(nodes: &[Node], edges: &[crate::model::Edge]) -> ConnectedComponentsReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = undirected_adjacency(&node_ids, edges);

    let mut component_of: IndexMap<String, String> = IndexMap::new();
    let mut components: Vec<ComponentSummary> = Vec::new();
    let mut counter: u64 = 0;

    for node in nodes {
        if component_of.contains_key(&node.id) {
            continue;
        }
        let component_id = format!("comp_{counter}");
        counter += 1;

        let mut members = Vec::new();
        let mut stack = vec![node.id.clone()];
        let mut seen: IndexSet<String> = IndexSet::new();
        seen.insert(node.id.clone());
        while let Some(id) = stack.pop() {
            members.push(id.clone());
            component_of.insert(id.clone(), component_id.clone());
            for neighbor in adjacency.neighbors(&id) {
                if seen.insert(neighbor.clone()) {
                    stack.push(neighbor.clone());
                }
            }
        }

        components.push(ComponentSummary {
            component_id,
            size: members.len(),
            nodes: members,
        });
    }

    let assignments = nodes
        .iter()
        .map(|n| ComponentAssignment {
            node_id: n.id.clone(),
            component_id: component_of.get(&n.id).cloned().unwrap_or_default(),
        })
        .collect();

    ConnectedComponentsReport {
        assignments,
        components,
    }
}

/// Number of connected components in the undirected view, optionally with
/// one node removed (used by bridge criticality in [`crate::algo::bridges`]).
pub(crate) fn component_count_excluding(
    nodes: &[Node],
    edges: &[crate::model::Edge],
    excluded: Option<&str>,
) -> usize {
    let node_ids: IndexSet<String> = nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| Some(*id) != excluded)
        .map(str::to_string)
        .collect();
    let filtered_edges: Vec<&crate::model::Edge> = edges
        .iter()
        .filter(|e| Some(e.from.as_str()) != excluded && Some(e.to.as_str()) != excluded)
        .collect();
    let adjacency = undirected_adjacency(
        &node_ids,
        &filtered_edges.iter().map(|e| (**e).clone()).collect::<Vec<_>>(),
    );

    let mut seen: IndexSet<String> = IndexSet::new();
    let mut count = 0;
    for id in &node_ids {
        if seen.contains(id) {
            continue;
        }
        count += 1;
        let mut stack = vec![id.clone()];
        seen.insert(id.clone());
        while let Some(cur) = stack.pop() {
            for neighbor in adjacency.neighbors(&cur) {
                if seen.insert(neighbor.clone()) {
                    stack.push(neighbor.clone());
                }
            }
        }
    }
    count
}
