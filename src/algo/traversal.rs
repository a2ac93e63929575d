//! BFS, plain DFS, and tracked DFS (§4.2).
//!
//! All three share the same output shape and the same "unknown source is
//! empty, not an error" behaviour; they differ only in the visitation
//! discipline (FIFO vs LIFO) and in what tracked DFS records per step.

use indexmap::IndexSet;

use crate::model::{Adjacency, Node, node_id_set};

/// One visited step of a BFS/DFS traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalStep {
    pub id: String,
    pub node_type: String,
    pub visited_order: u64,
    pub depth: u64,
    pub parent_id: Option<String>,
    pub parent_type: Option<String>,
}

/// A tracked-DFS step, additionally carrying the edge types of every
/// parallel edge from `parent_id` to `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackedDfsStep {
    pub id: String,
    pub node_type: String,
    pub visited_order: u64,
    pub depth: u64,
    pub parent_id: Option<String>,
    pub parent_type: Option<String>,
    pub parent_edge_types: Vec<String>,
}

fn node_type_of<'a>(nodes: &'a [Node], id: &str) -> &'a str {
    nodes
        .iter()
        .find(|n| n.id == id)
        .map(|n| n.node_type.as_str())
        .unwrap_or("")
}

/// Breadth-first traversal from `source_id`. Expands neighbors in
/// forward-adjacency insertion order. An unknown `source_id` yields an
/// empty sequence.
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_bfs(nodes: &[Node], edges: &[crate::model::Edge], source_id: &str) -> Vec<TraversalStep> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    if !node_ids.contains(source_id) {
        return Vec::new();
    }
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    let mut out = Vec::new();
    let mut visited: IndexSet<String> = IndexSet::new();
    let mut queue: std::collections::VecDeque<(String, u64, Option<String>)> = std::collections::VecDeque::new();

    visited.insert(source_id.to_string());
    queue.push_back((source_id.to_string(), 0, None));

    let mut order: u64 = 0;
    while let Some((id, depth, parent_id)) = queue.pop_front() {
        let node_type = node_type_of(nodes, &id).to_string();
        let parent_type = parent_id.as_deref().map(|p| node_type_of(nodes, p).to_string());
        out.push(TraversalStep {
            id: id.clone(),
            node_type,
            visited_order: order,
            depth,
            parent_id,
            parent_type,
        });
        order += 1;

        for neighbor in adjacency.neighbors(&id) {
            if visited.insert(neighbor.clone()) {
                queue.push_back((neighbor.clone(), depth + 1, Some(id.clone())));
            }
        }
    }

    out
}

/// Depth-first traversal from `source_id`, LIFO over an explicit stack.
/// Children pushed later are visited first ("last-child-first"),
/// matching the adjacency insertion order being reversed at push time.
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_dfs(nodes: &[Node], edges: &[crate::model::Edge], source_id: &str) -> Vec<TraversalStep> {
    graph_tracked_dfs(nodes, edges, source_id, None)
        .into_iter()
        .map(|step| TraversalStep {
            id: step.id,
            node_type: step.node_type,
            visited_order: step.visited_order,
            depth: step.depth,
            parent_id: step.parent_id,
            parent_type: step.parent_type,
        })
        .collect()
}

/// Depth-first traversal from `source_id` that additionally records, per
/// step, the edge-type labels of every parallel edge from the parent. An
/// optional `limit` caps `depth` inclusively. An unknown `source_id` yields
/// an empty sequence (§7, pinned by tests).
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_tracked_dfs(
    nodes: &[Node],
    edges: &[crate::model::Edge],
    source_id: &str,
    limit: Option<u64>,
) -> Vec<TrackedDfsStep> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    if !node_ids.contains(source_id) {
        return Vec::new();
    }
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    let mut out = Vec::new();
    let mut visited: IndexSet<String> = IndexSet::new();
    // Stack entries: (id, depth, parent_id).
    let mut stack: Vec<(String, u64, Option<String>)> = vec![(source_id.to_string(), 0, None)];
    let mut order: u64 = 0;

    while let Some((id, depth, parent_id)) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        let node_type = node_type_of(nodes, &id).to_string();
        let parent_type = parent_id.as_deref().map(|p| node_type_of(nodes, p).to_string());
        let parent_edge_types = parent_id
            .as_deref()
            .map(|p| adjacency.edge_types_between(p, &id).iter().cloned().collect::<IndexSet<String>>().into_iter().collect())
            .unwrap_or_default();

        out.push(TrackedDfsStep {
            id: id.clone(),
            node_type,
            visited_order: order,
            depth,
            parent_id,
            parent_type,
            parent_edge_types,
        });
        order += 1;

        if limit.is_some_and(|max| depth >= max) {
            continue;
        }

        // Push in forward order so popping (LIFO) visits the *last*
        // unvisited neighbor first, per §4.2's pinned "last-child-first".
        for neighbor in adjacency.neighbors(&id) {
            if !visited.contains(neighbor) {
                stack.push((neighbor.clone(), depth + 1, Some(id.clone())));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn fixture() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::new("A", "t"),
            Node::new("B", "t"),
            Node::new("C", "t"),
            Node::new("D", "t"),
        ];
        let edges = vec![
            Edge::new("A", "B", "rel"),
            Edge::new("A", "C", "rel"),
            Edge::new("B", "D", "rel"),
        ];
        (nodes, edges)
    }

    #[test]
    fn bfs_depths_are_adjacent() {
        let (nodes, edges) = fixture();
        let steps = graph_bfs(&nodes, &edges, "A");
        let depth = |id: &str| steps.iter().find(|s| s.id == id).unwrap().depth;
        assert_eq!(depth("A"), 0);
        assert_eq!(depth("B"), 1);
        assert_eq!(depth("C"), 1);
        assert_eq!(depth("D"), 2);
    }

    #[test]
    fn bfs_unknown_source_is_empty() {
        let (nodes, edges) = fixture();
        assert!(graph_bfs(&nodes, &edges, "nope").is_empty());
    }

    #[test]
    fn dfs_visits_last_child_first() {
        let (nodes, edges) = fixture();
        let steps = graph_dfs(&nodes, &edges, "A");
        let order: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        // A pushes B then C; popping LIFO visits C before B.
        assert_eq!(order, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn tracked_dfs_respects_limit() {
        let (nodes, edges) = fixture();
        let steps = graph_tracked_dfs(&nodes, &edges, "A", Some(1));
        let order: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn tracked_dfs_collects_parallel_edge_types() {
        let nodes = vec![Node::new("A", "t"), Node::new("B", "t")];
        let edges = vec![Edge::new("A", "B", "one"), Edge::new("A", "B", "two")];
        let steps = graph_tracked_dfs(&nodes, &edges, "A", None);
        let b = steps.iter().find(|s| s.id == "B").unwrap();
        assert_eq!(b.parent_edge_types, vec!["one", "two"]);
    }

    #[test]
    fn tracked_dfs_dedups_identical_parallel_edge_types() {
        let nodes = vec![Node::new("A", "t"), Node::new("B", "t")];
        let edges = vec![Edge::new("A", "B", "one"), Edge::new("A", "B", "one")];
        let steps = graph_tracked_dfs(&nodes, &edges, "A", None);
        let b = steps.iter().find(|s| s.id == "B").unwrap();
        assert_eq!(b.parent_edge_types, vec!["one"]);
    }
}
