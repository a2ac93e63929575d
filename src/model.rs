//! Data model: node/edge record types and the adjacency representation
//! built from them.
//!
//! All records are plain, immutable data — no behaviour, no shared state.
//! `Node`/`Edge` are the base shape (§3); the other node/edge records extend
//! that shape with exactly the field an algorithm family needs, rather than
//! modelling the union of all possible fields on one struct.

use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A plain graph node: identity plus semantic label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub node_type: String,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            node_type: node_type.into(),
        }
    }
}

/// A plain directed edge: ordered pair plus semantic label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub edge_type: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, edge_type: impl Into<String>) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
            edge_type: edge_type.into(),
        }
    }
}

/// A node carrying a single real-valued measure, used by the bottom-up and
/// top-down rollup kernels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueNode {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub node_type: String,
    pub value: f64,
}

/// A node carrying a per-key mapping of real values, used by the group
/// rollup kernel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupValueNode {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub node_type: String,
    pub value: IndexMap<String, f64>,
}

/// A node with a start/end instant (milliseconds since epoch), used by the
/// temporal rollup kernels and the critical-path (CPM) kernel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemporalNode {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub node_type: String,
    pub start_time: i64,
    pub end_time: i64,
}

/// An edge carrying a non-negative real weight, used by Dijkstra.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightedEdge {
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub edge_type: String,
    pub weight: f64,
}

/// An edge that can be toggled out of the graph for dynamic reachability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DynamicEdge {
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub edge_type: String,
    pub active: bool,
}

/// A node with an optional capacity, used by the volume-flow kernel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeNode {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub node_type: String,
    pub capacity: Option<f64>,
}

/// An edge carrying a transported volume, used by the volume-flow kernel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeEdge {
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub edge_type: String,
    pub volume: f64,
}

/// An edge carrying a loss percentage, used by the flow-conservation kernel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub edge_type: String,
    pub loss_percentage: f64,
}

/// The forward/reverse adjacency built from a node/edge input (§4.1).
///
/// Parallel `(from, to)` pairs collapse: the first occurrence wins the
/// position in `forward`/`reverse`, but every edge type seen between the
/// pair is kept in `edge_types` so tracked traversal can still report them.
/// Edges referencing an id outside `node_ids` are dangling and are dropped
/// here (they are reported, not failed, by [`crate::algo::validation`]).
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub forward: IndexMap<String, Vec<String>>,
    pub reverse: IndexMap<String, Vec<String>>,
    pub edge_types: IndexMap<(String, String), Vec<String>>,
}

impl Adjacency {
    /// Build adjacency from a node-id universe and an iterator of
    /// `(from, to, edge_type)` triples. `node_ids` determines both which
    /// edges are valid and the key order used to seed empty entries so
    /// every present node has a (possibly empty) forward/reverse list.
    pub fn build<'a, I>(node_ids: &IndexSet<String>, edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut forward: IndexMap<String, Vec<String>> = node_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        let mut reverse: IndexMap<String, Vec<String>> = node_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        let mut seen_pairs: IndexSet<(String, String)> = IndexSet::new();
        let mut edge_types: IndexMap<(String, String), Vec<String>> = IndexMap::new();

        for (from, to, edge_type) in edges {
            if !node_ids.contains(from) || !node_ids.contains(to) {
                continue;
            }
            let pair = (from.to_string(), to.to_string());
            edge_types
                .entry(pair.clone())
                .or_default()
                .push(edge_type.to_string());
            if seen_pairs.insert(pair) {
                forward.get_mut(from).unwrap().push(to.to_string());
                reverse.get_mut(to).unwrap().push(from.to_string());
            }
        }

        Adjacency {
            forward,
            reverse,
            edge_types,
        }
    }

    pub fn neighbors(&self, id: &str) -> &[String] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: &str) -> &[String] {
        self.reverse.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_types_between(&self, from: &str, to: &str) -> &[String] {
        self.edge_types
            .get(&(from.to_string(), to.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Returns the duration in minutes between two millisecond epoch instants.
/// Mirrors the host's time-duration primitive (treated as a pure function,
/// out of scope per §1).
pub fn duration_minutes(start: i64, end: i64) -> f64 {
    (end - start) as f64 / 60_000.0
}

pub(crate) fn node_id_set<'a, I: IntoIterator<Item = &'a str>>(ids: I) -> IndexSet<String> {
    ids.into_iter().map(str::to_string).collect()
}
