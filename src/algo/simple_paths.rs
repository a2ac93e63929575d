//! All-simple-paths enumeration between two nodes (§4.6).
//!
//! Adapted from the classic NetworkX-style DFS-with-prefix approach: a
//! neighbor already present in the current path prefix is rejected, which
//! both avoids revisits and rules out cycles in the enumeration. Discovery
//! order is the order in which DFS completes each branch.

use indexmap::IndexSet;

use crate::model::{Adjacency, Node, node_id_set};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllSimplePathsReport {
    pub paths: Vec<Vec<String>>,
    pub count: usize,
}

/// Enumerates all simple paths from `start` to `end`. Unknown endpoints or
/// an unreachable target simply produce zero paths.
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_all_simple_paths(nodes: &[Node], edges: &[crate::model::Edge], start: &str, end: &str) -> AllSimplePathsReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    if !node_ids.contains(start) || !node_ids.contains(end) {
        return AllSimplePathsReport::default();
    }
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    let mut paths = Vec::new();
    let mut prefix: IndexSet<String> = IndexSet::new();
    let mut path: Vec<String> = Vec::new();

    prefix.insert(start.to_string());
    path.push(start.to_string());
    walk(&adjacency, start, end, &mut prefix, &mut path, &mut paths);

    let count = paths.len();
    AllSimplePathsReport { paths, count }
}

fn walk(
    adjacency: &Adjacency,
    current: &str,
    end: &str,
    prefix: &mut IndexSet<String>,
    path: &mut Vec<String>,
    paths: &mut Vec<Vec<String>>,
) {
    if current == end {
        paths.push(path.clone());
        return;
    }
    for neighbor in adjacency.neighbors(current).to_vec() {
        if prefix.contains(&neighbor) {
            continue;
        }
        prefix.insert(neighbor.clone());
        path.push(neighbor.clone());
        walk(adjacency, &neighbor, end, prefix, path, paths);
        path.pop();
        prefix.shift_remove(&neighbor);
    }
}

/// For each input node, returns the list of path indices (into
/// [`AllSimplePathsReport::paths`]) that contain it.
pub fn graph_path_membership(report: &AllSimplePathsReport, nodes: &[Node]) -> Vec<(String, Vec<usize>)> {
    nodes
        .iter()
        .map(|n| {
            let indices = report
                .paths
                .iter()
                .enumerate()
                .filter_map(|(i, path)| path.contains(&n.id).then_some(i))
                .collect();
            (n.id.clone(), indices)
        })
        .collect()
}
