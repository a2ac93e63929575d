//! Bridge (criticality) analysis (§4.3).
//!
//! Unlike the textbook "bridge edge", here a *bridge node* is one whose
//! removal increases the undirected component count; `criticality_score`
//! normalizes that increase by graph size.

use crate::algo::connected_components::component_count_excluding;
use crate::model::Node;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeReport {
    pub node_id: String,
    pub component_increase: i64,
    pub criticality_score: f64,
}

/// Reports only nodes whose removal strictly increases the component count.
pub fn graph_bridges(nodes: &[Node], edges: &[crate::model::Edge]) -> Vec<BridgeReport> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let before = component_count_excluding(nodes, edges, None);
    let total = nodes.len() as f64;

    nodes
        .iter()
        .filter_map(|node| {
            let after = component_count_excluding(nodes, edges, Some(&node.id));
            let increase = after as i64 - before as i64;
            if increase > 0 {
                Some(BridgeReport {
                    node_id: node.id.clone(),
                    component_increase: increase,
                    criticality_score: increase as f64 / total,
                })
            } else {
                None
            }
        })
        .collect()
}
