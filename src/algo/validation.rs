//! Structural validation: duplicate/dangling/orphan detection and the
//! oversized-input guard (§4.10).

use indexmap::IndexSet;

use crate::error::{GraphError, GraphResult};
use crate::model::{Edge, Node};
use crate::{MAX_EDGES, MAX_NODES};

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    pub duplicate_node_ids: Vec<String>,
    pub duplicate_edges: Vec<Edge>,
    pub dangling_edges: Vec<Edge>,
    pub orphaned_nodes: Vec<String>,
    pub connectivity_ratio: f64,
}

/// Scans `nodes`/`edges` for structural defects. Duplicates collapse to
/// the first occurrence (not an error); dangling edges and orphaned nodes
/// are reported, not rejected. Fails with [`GraphError::InputTooLarge`]
/// if either collection exceeds [`crate::MAX_NODES`] / [`crate::MAX_EDGES`].
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_validate(nodes: &[Node], edges: &[Edge]) -> GraphResult<ValidationReport> {
    if nodes.len() > MAX_NODES || edges.len() > MAX_EDGES {
        return Err(GraphError::InputTooLarge {
            nodes: nodes.len(),
            edges: edges.len(),
            max_nodes: MAX_NODES,
            max_edges: MAX_EDGES,
        });
    }

    let mut seen_ids: IndexSet<&str> = IndexSet::new();
    let mut duplicate_node_ids = Vec::new();
    for n in nodes {
        if !seen_ids.insert(n.id.as_str()) {
            duplicate_node_ids.push(n.id.clone());
        }
    }
    let valid_ids: IndexSet<&str> = seen_ids.clone();

    let mut seen_pairs: IndexSet<(&str, &str)> = IndexSet::new();
    let mut duplicate_edges = Vec::new();
    let mut dangling_edges = Vec::new();
    let mut referenced: IndexSet<&str> = IndexSet::new();
    for e in edges {
        if !valid_ids.contains(e.from.as_str()) || !valid_ids.contains(e.to.as_str()) {
            dangling_edges.push(e.clone());
            continue;
        }
        referenced.insert(e.from.as_str());
        referenced.insert(e.to.as_str());
        if !seen_pairs.insert((e.from.as_str(), e.to.as_str())) {
            duplicate_edges.push(e.clone());
        }
    }

    let orphaned_nodes: Vec<String> = nodes
        .iter()
        .filter(|n| seen_ids.contains(n.id.as_str()) && !referenced.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    let connectivity_ratio = if valid_ids.is_empty() {
        0.0
    } else {
        referenced.len() as f64 / valid_ids.len() as f64
    };

    Ok(ValidationReport {
        duplicate_node_ids,
        duplicate_edges,
        dangling_edges,
        orphaned_nodes,
        connectivity_ratio,
    })
}
