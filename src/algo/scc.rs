//! Strongly connected components via iterative Tarjan (§4.3).
//!
//! Iterative to avoid recursion-depth limits on large inputs; the
//! visitation order of SCC roots is whatever the algorithm produces and is
//! explicitly not required to be sorted.

use indexmap::IndexMap;

use crate::model::{Adjacency, Node, node_id_set};

struct Frame {
    id: String,
    neighbors: Vec<String>,
    pos: usize,
}

/// Iterative Tarjan over the directed graph. Returns one `Vec<String>` per
/// SCC (node ids); self-loops and multi-edges have no effect on the
/// partition since it is driven purely by reachability.
#[tracing::instrument(level = "debug", skip(nodes, edges))]
pub fn graph_strongly_connected_components(nodes: &[Node], edges: &[crate::model::Edge]) -> Vec<Vec<String>> {
    let node_ids = node_id_set(nodes.iter().map(|n| n.id.as_str()));
    let adjacency = Adjacency::build(
        &node_ids,
        edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.edge_type.as_str())),
    );

    let mut index_of: IndexMap<String, usize> = IndexMap::new();
    let mut lowlink: IndexMap<String, usize> = IndexMap::new();
    let mut on_stack: IndexMap<String, bool> = IndexMap::new();
    let mut tarjan_stack: Vec<String> = Vec::new();
    let mut next_index: usize = 0;
    let mut sccs: Vec<Vec<String>> = Vec::new();

    for root in nodes {
        if index_of.contains_key(&root.id) {
            continue;
        }

        index_of.insert(root.id.clone(), next_index);
        lowlink.insert(root.id.clone(), next_index);
        next_index += 1;
        on_stack.insert(root.id.clone(), true);
        tarjan_stack.push(root.id.clone());

        let mut work: Vec<Frame> = vec![Frame {
            neighbors: adjacency.neighbors(&root.id).to_vec(),
            id: root.id.clone(),
            pos: 0,
        }];

        while let Some(frame) = work.last_mut() {
            if frame.pos < frame.neighbors.len() {
                let w = frame.neighbors[frame.pos].clone();
                frame.pos += 1;
                if !index_of.contains_key(&w) {
                    index_of.insert(w.clone(), next_index);
                    lowlink.insert(w.clone(), next_index);
                    next_index += 1;
                    on_stack.insert(w.clone(), true);
                    tarjan_stack.push(w.clone());
                    work.push(Frame {
                        neighbors: adjacency.neighbors(&w).to_vec(),
                        id: w,
                        pos: 0,
                    });
                } else if *on_stack.get(&w).unwrap_or(&false) {
                    let v_id = frame.id.clone();
                    let v_low = lowlink[&v_id];
                    let w_index = index_of[&w];
                    lowlink.insert(v_id, v_low.min(w_index));
                }
            } else {
                let v = frame.id.clone();
                work.pop();
                if let Some(parent) = work.last() {
                    let v_low = lowlink[&v];
                    let p_low = lowlink[&parent.id];
                    lowlink.insert(parent.id.clone(), p_low.min(v_low));
                }
                if lowlink[&v] == index_of[&v] {
                    let mut component = Vec::new();
                    loop {
                        let w = tarjan_stack.pop().unwrap();
                        on_stack.insert(w.clone(), false);
                        let done = w == v;
                        component.push(w);
                        if done {
                            break;
                        }
                    }
                    sccs.push(component);
                }
            }
        }
    }

    sccs
}
