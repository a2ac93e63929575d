//! Subgraph extraction: backward-from-targets, forward-from-sources,
//! SCC expansion, bidirectional network extraction, and connected-component
//! grouping (§4.7).
//!
//! All variants return one subgraph per "starting point", partitioning its
//! referenced nodes into `source_nodes` / `target_nodes` /
//! `intermediate_nodes`. Where a node could satisfy both the source and
//! target predicate, source classification wins so the three buckets stay
//! disjoint per the §3 partition invariant.

use indexmap::{IndexMap, IndexSet};

use crate::algo::scc::graph_strongly_connected_components;
use crate::error::{GraphError, GraphResult};
use crate::model::{Adjacency, Edge, Node, node_id_set};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subgraph {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub source_nodes: Vec<String>,
    pub target_nodes: Vec<String>,
    pub intermediate_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrongSubgraph {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub source_nodes: Vec<String>,
    pub target_nodes: Vec<String>,
    pub node_types: IndexSet<String>,
    pub edge_types: IndexSet<String>,
}

fn classify(
    node_set: &IndexSet<String>,
    edges: &[Edge],
    is_source: impl Fn(&str) -> bool,
    is_target: impl Fn(&str) -> bool,
) -> Subgraph {
    let mut source_nodes = Vec::new();
    let mut target_nodes = Vec::new();
    let mut intermediate_nodes = Vec::new();
    for id in node_set {
        if is_source(id) {
            source_nodes.push(id.clone());
        } else if is_target(id) {
            target_nodes.push(id.clone());
        } else {
            intermediate_nodes.push(id.clone());
        }
    }
    let internal_edges = edges
        .iter()
        .filter(|e| node_set.contains(&e.from) && node_set.contains(&e.to))
        .cloned()
        .collect();
    Subgraph {
        nodes: node_set.iter().cloned().collect(),
        edges: internal_edges,
        source_nodes,
        target_nodes,
        intermediate_nodes,
    }
}

/// Backward DFS over the reverse adjacency, one subgraph per unprocessed
/// target; `target_node_types` must be non-empty.
pub fn graph_subgraphs_from_targets(
    nodes: &[Node],
    edges: &[Edge],
    source_node_types: &[String],
    target_node_types: &[String],
) -> GraphResult<Vec<Subgraph>> {
    if target_node_types.is_empty() {
        return Err(GraphError::InvalidArgument(
            "target_node_types must be non-empty".to_string(),
        ));
    }
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();
    let target_types: IndexSet<&str> = target_node_types.iter().map(String::as_str).collect();
    let source_types: IndexSet<&str> = source_node_types.iter().map(String::as_str).collect();
    let no_incoming: IndexSet<String> = nodes
        .iter()
        .filter(|n| adjacency.predecessors(&n.id).is_empty())
        .map(|n| n.id.clone())
        .collect();

    let is_source = |id: &str| -> bool {
        if source_types.is_empty() {
            no_incoming.contains(id)
        } else {
            type_of.get(id).is_some_and(|t| source_types.contains(t))
        }
    };
    let is_target = |id: &str| -> bool { type_of.get(id).is_some_and(|t| target_types.contains(t)) };

    let mut processed: IndexSet<String> = IndexSet::new();
    let mut subgraphs = Vec::new();
    for target in nodes.iter().filter(|n| target_types.contains(n.node_type.as_str())) {
        if processed.contains(&target.id) {
            continue;
        }
        let visited = reachable_set(&adjacency, &target.id, false);
        processed.extend(visited.iter().cloned());
        subgraphs.push(classify(&visited, edges, is_source, is_target));
    }
    Ok(subgraphs)
}

/// Forward DFS over the forward adjacency, one subgraph per unprocessed
/// source; `source_node_types` must be non-empty.
pub fn graph_subgraphs_from_sources(
    nodes: &[Node],
    edges: &[Edge],
    source_node_types: &[String],
    target_node_types: &[String],
) -> GraphResult<Vec<Subgraph>> {
    if source_node_types.is_empty() {
        return Err(GraphError::InvalidArgument(
            "source_node_types must be non-empty".to_string(),
        ));
    }
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();
    let source_types: IndexSet<&str> = source_node_types.iter().map(String::as_str).collect();
    let target_types: IndexSet<&str> = target_node_types.iter().map(String::as_str).collect();
    let no_outgoing: IndexSet<String> = nodes
        .iter()
        .filter(|n| adjacency.neighbors(&n.id).is_empty())
        .map(|n| n.id.clone())
        .collect();

    let is_source = |id: &str| -> bool { type_of.get(id).is_some_and(|t| source_types.contains(t)) };
    let is_target = |id: &str| -> bool {
        if target_types.is_empty() {
            no_outgoing.contains(id)
        } else {
            type_of.get(id).is_some_and(|t| target_types.contains(t))
        }
    };

    let mut processed: IndexSet<String> = IndexSet::new();
    let mut subgraphs = Vec::new();
    for source in nodes.iter().filter(|n| source_types.contains(n.node_type.as_str())) {
        if processed.contains(&source.id) {
            continue;
        }
        let visited = reachable_set(&adjacency, &source.id, true);
        processed.extend(visited.iter().cloned());
        subgraphs.push(classify(&visited, edges, is_source, is_target));
    }
    Ok(subgraphs)
}

fn reachable_set(adjacency: &Adjacency, start: &str, forward: bool) -> IndexSet<String> {
    let mut visited = IndexSet::new();
    visited.insert(start.to_string());
    let mut stack = vec![start.to_string()];
    while let Some(id) = stack.pop() {
        let next = if forward { adjacency.neighbors(&id) } else { adjacency.predecessors(&id) };
        for n in next {
            if visited.insert(n.clone()) {
                stack.push(n.clone());
            }
        }
    }
    visited
}

/// Expands each SCC into a full subgraph with node/edge-type summaries,
/// optionally filtered so at least one node/edge in each required subset
/// is present. Per-SCC "source"/"target" ids have no in/out edge
/// *within* the SCC.
pub fn graph_strong_subgraphs(
    nodes: &[Node],
    edges: &[Edge],
    required_node_type_subsets: &[Vec<String>],
    required_edge_type_subsets: &[Vec<String>],
) -> Vec<StrongSubgraph> {
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();
    let sccs = graph_strongly_connected_components(nodes, edges);

    sccs.into_iter()
        .filter_map(|members| {
            let member_set: IndexSet<String> = members.iter().cloned().collect();
            let internal_edges: Vec<Edge> = edges
                .iter()
                .filter(|e| member_set.contains(&e.from) && member_set.contains(&e.to))
                .cloned()
                .collect();

            let node_types: IndexSet<String> = members
                .iter()
                .filter_map(|id| type_of.get(id.as_str()).map(|t| t.to_string()))
                .collect();
            let edge_types: IndexSet<String> = internal_edges.iter().map(|e| e.edge_type.clone()).collect();

            if !required_node_type_subsets.is_empty() {
                let satisfies = required_node_type_subsets
                    .iter()
                    .all(|subset| subset.iter().any(|t| node_types.contains(t)));
                if !satisfies {
                    return None;
                }
            }
            if !required_edge_type_subsets.is_empty() {
                let satisfies = required_edge_type_subsets
                    .iter()
                    .all(|subset| subset.iter().any(|t| edge_types.contains(t)));
                if !satisfies {
                    return None;
                }
            }

            let has_internal_incoming: IndexSet<&str> = internal_edges.iter().map(|e| e.to.as_str()).collect();
            let has_internal_outgoing: IndexSet<&str> = internal_edges.iter().map(|e| e.from.as_str()).collect();
            let source_nodes: Vec<String> = members
                .iter()
                .filter(|id| !has_internal_incoming.contains(id.as_str()))
                .cloned()
                .collect();
            let target_nodes: Vec<String> = members
                .iter()
                .filter(|id| !has_internal_outgoing.contains(id.as_str()))
                .cloned()
                .collect();

            Some(StrongSubgraph {
                nodes: members,
                edges: internal_edges,
                source_nodes,
                target_nodes,
                node_types,
                edge_types,
            })
        })
        .collect()
}

/// Batch genealogy extraction: for each unprocessed starting id, unions
/// forward- and backward-reachable nodes, then iteratively pulls in any
/// node with an outgoing edge into the current set ("external source
/// closure"). Invalid or duplicate starting ids are silently ignored.
/// Returns no subgraphs if both `source_node_ids` and `target_node_ids`
/// are empty.
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_network_extraction(
    nodes: &[Node],
    edges: &[Edge],
    source_node_ids: &[String],
    target_node_ids: &[String],
) -> Vec<Subgraph> {
    if source_node_ids.is_empty() && target_node_ids.is_empty() {
        return Vec::new();
    }
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let source_set: IndexSet<&str> = source_node_ids.iter().map(String::as_str).collect();
    let target_set: IndexSet<&str> = target_node_ids.iter().map(String::as_str).collect();

    let starting_ids: IndexSet<String> = source_node_ids
        .iter()
        .chain(target_node_ids.iter())
        .filter(|id| node_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let mut processed: IndexSet<String> = IndexSet::new();
    let mut subgraphs = Vec::new();

    for start in &starting_ids {
        if processed.contains(start) {
            continue;
        }
        let mut members: IndexSet<String> = reachable_set(&adjacency, start, true);
        members.extend(reachable_set(&adjacency, start, false));

        loop {
            let mut added = false;
            for id in nodes.iter().map(|n| n.id.as_str()) {
                if members.contains(id) {
                    continue;
                }
                if adjacency.neighbors(id).iter().any(|n| members.contains(n)) {
                    members.insert(id.to_string());
                    added = true;
                }
            }
            if !added {
                break;
            }
        }

        processed.extend(members.iter().cloned());
        let is_source = |id: &str| source_set.contains(id);
        let is_target = |id: &str| target_set.contains(id);
        subgraphs.push(classify(&members, edges, is_source, is_target));
    }

    subgraphs
}

/// One subgraph per connected component (undirected view), optionally
/// restricted to components containing at least one node whose type is in
/// `type_filter`. Sources/targets auto-detect as no-incoming/no-outgoing
/// in the *whole* graph.
pub fn graph_subgraphs(nodes: &[Node], edges: &[Edge], type_filter: &[String]) -> Vec<Subgraph> {
    let report = crate::algo::connected_components::graph_connected_components(nodes, edges);
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );
    let type_of: IndexMap<&str, &str> = nodes.iter().map(|n| (n.id.as_str(), n.node_type.as_str())).collect();
    let filter: IndexSet<&str> = type_filter.iter().map(String::as_str).collect();

    let no_incoming: IndexSet<String> = nodes
        .iter()
        .filter(|n| adjacency.predecessors(&n.id).is_empty())
        .map(|n| n.id.clone())
        .collect();
    let no_outgoing: IndexSet<String> = nodes
        .iter()
        .filter(|n| adjacency.neighbors(&n.id).is_empty())
        .map(|n| n.id.clone())
        .collect();

    report
        .components
        .into_iter()
        .filter(|component| {
            filter.is_empty()
                || component
                    .nodes
                    .iter()
                    .any(|id| type_of.get(id.as_str()).is_some_and(|t| filter.contains(t)))
        })
        .map(|component| {
            let member_set: IndexSet<String> = component.nodes.into_iter().collect();
            classify(
                &member_set,
                edges,
                |id| no_incoming.contains(id),
                |id| no_outgoing.contains(id),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    #[test]
    fn subgraphs_from_targets_requires_target_types() {
        let nodes = vec![Node::new("A", "t")];
        let err = graph_subgraphs_from_targets(&nodes, &[], &[], &[]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
    }

    #[test]
    fn network_extraction_splits_disjoint_chains() {
        let nodes = vec![
            Node::new("A", "t"),
            Node::new("B", "t"),
            Node::new("C", "t"),
            Node::new("X", "t"),
            Node::new("Y", "t"),
            Node::new("Z", "t"),
        ];
        let edges = vec![
            Edge::new("A", "B", "r"),
            Edge::new("B", "C", "r"),
            Edge::new("X", "Y", "r"),
            Edge::new("Y", "Z", "r"),
        ];
        let source_ids = vec!["A".to_string(), "X".to_string()];
        let subgraphs = graph_network_extraction(&nodes, &edges, &source_ids, &[]);
        assert_eq!(subgraphs.len(), 2);
        let mut sizes: Vec<usize> = subgraphs.iter().map(|s| s.nodes.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3]);
    }

    #[test]
    fn network_extraction_is_empty_without_any_endpoints() {
        let nodes = vec![Node::new("A", "t")];
        assert!(graph_network_extraction(&nodes, &[], &[], &[]).is_empty());
    }

    #[test]
    fn subgraphs_from_component_groups_all_nodes() {
        let nodes = vec![Node::new("A", "t"), Node::new("B", "t"), Node::new("X", "t")];
        let edges = vec![Edge::new("A", "B", "r")];
        let subgraphs = graph_subgraphs(&nodes, &edges, &[]);
        assert_eq!(subgraphs.len(), 2);
    }

    #[test]
    fn strong_subgraphs_reports_scc_internal_boundaries() {
        let nodes = vec![Node::new("A", "t1"), Node::new("B", "t2"), Node::new("C", "t1")];
        let edges = vec![Edge::new("A", "B", "e1"), Edge::new("B", "C", "e1"), Edge::new("C", "A", "e1")];
        let subgraphs = graph_strong_subgraphs(&nodes, &edges, &[], &[]);
        assert_eq!(subgraphs.len(), 1);
        assert_eq!(subgraphs[0].nodes.len(), 3);
        assert!(subgraphs[0].source_nodes.is_empty());
        assert!(subgraphs[0].target_nodes.is_empty());
    }
}
