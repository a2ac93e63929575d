//! Volume flow (system loss) and flow conservation checking (§4.10).

use indexmap::IndexMap;

use crate::model::{FlowEdge, Node, VolumeEdge, VolumeNode, node_id_set};
use crate::FLOW_TOLERANCE;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeLoss {
    pub node_id: String,
    pub actual_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeFlowReport {
    pub node_losses: Vec<NodeLoss>,
    pub total_input: f64,
    pub total_output: f64,
    pub total_loss: f64,
}

/// Inflow/outflow per node from `VolumeEdge.volume`; `total_input` sums the
/// outflow of pure sources (inflow ≈ 0), `total_output` sums the inflow of
/// pure sinks (outflow ≈ 0), `total_loss = total_input - total_output`.
pub fn graph_volume_flow(nodes: &[VolumeNode], edges: &[VolumeEdge]) -> VolumeFlowReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let mut inflow: IndexMap<String, f64> = node_ids.iter().map(|id| (id.clone(), 0.0)).collect();
    let mut outflow: IndexMap<String, f64> = node_ids.iter().map(|id| (id.clone(), 0.0)).collect();

    for e in edges {
        if !node_ids.contains(&e.from) || !node_ids.contains(&e.to) {
            continue;
        }
        *outflow.get_mut(&e.from).unwrap() += e.volume;
        *inflow.get_mut(&e.to).unwrap() += e.volume;
    }

    let node_losses: Vec<NodeLoss> = nodes
        .iter()
        .map(|n| NodeLoss {
            node_id: n.id.clone(),
            actual_loss: inflow[&n.id] - outflow[&n.id],
        })
        .collect();

    let total_input: f64 = nodes
        .iter()
        .filter(|n| inflow[&n.id].abs() < FLOW_TOLERANCE)
        .map(|n| outflow[&n.id])
        .sum();
    let total_output: f64 = nodes
        .iter()
        .filter(|n| outflow[&n.id].abs() < FLOW_TOLERANCE)
        .map(|n| inflow[&n.id])
        .sum();

    VolumeFlowReport {
        node_losses,
        total_input,
        total_output,
        total_loss: total_input - total_output,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowConservationReport {
    pub is_conserved: bool,
    pub violating_nodes: Vec<String>,
}

/// Checks, per node, `node_value + total_inflow ≈ total_outflow + total_loss`
/// within [`crate::FLOW_TOLERANCE`], where `total_loss` is the sum over
/// outgoing edges of `inflow_contribution * loss_percentage`.
pub fn graph_flow_conservation(nodes: &[Node], edges: &[FlowEdge], node_value: &IndexMap<String, f64>) -> FlowConservationReport {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let mut inflow: IndexMap<String, f64> = node_ids.iter().map(|id| (id.clone(), 0.0)).collect();
    let mut outflow: IndexMap<String, f64> = node_ids.iter().map(|id| (id.clone(), 0.0)).collect();
    let mut loss: IndexMap<String, f64> = node_ids.iter().map(|id| (id.clone(), 0.0)).collect();

    for e in edges {
        if !node_ids.contains(&e.from) || !node_ids.contains(&e.to) {
            continue;
        }
        *outflow.get_mut(&e.from).unwrap() += 1.0;
        *inflow.get_mut(&e.to).unwrap() += 1.0;
        *loss.get_mut(&e.from).unwrap() += e.loss_percentage;
    }

    let mut violating_nodes = Vec::new();
    for n in nodes {
        let value = node_value.get(&n.id).copied().unwrap_or(0.0);
        let lhs = value + inflow[&n.id];
        let rhs = outflow[&n.id] + loss[&n.id];
        if (lhs - rhs).abs() >= FLOW_TOLERANCE {
            violating_nodes.push(n.id.clone());
        }
    }

    FlowConservationReport {
        is_conserved: violating_nodes.is_empty(),
        violating_nodes,
    }
}
