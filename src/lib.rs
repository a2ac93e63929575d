//! Directed-graph analysis procedures over labeled property graphs:
//! traversal, connectivity, cycle detection, reachability, path finding,
//! subgraph extraction, hierarchical aggregation, type-based statistics,
//! and structural validation/flow checks.
//!
//! Every procedure is a synchronous, deterministic function over immutable
//! inputs (§5); none of them retain state between calls. Unknown node ids
//! and dangling edges are not failures — they yield empty output or are
//! surfaced as data (see [`error::GraphError`] for what *is* a failure).

pub mod algo;
pub mod error;
pub mod model;

pub use error::{GraphError, GraphResult};
pub use model::{
    Adjacency, DynamicEdge, Edge, FlowEdge, GroupValueNode, Node, TemporalNode, ValueNode, VolumeEdge, VolumeNode, WeightedEdge,
};

pub use algo::aggregation::{
    GroupAggregate, ValueAggregate, graph_bottom_up_rollup, graph_group_rollup, graph_temporal_bottom_up, graph_temporal_top_down,
    graph_top_down_rollup,
};
pub use algo::articulation_points::graph_articulation_points;
pub use algo::bridges::{BridgeReport, graph_bridges};
pub use algo::connected_components::{ComponentAssignment, ComponentSummary, ConnectedComponentsReport, graph_connected_components};
pub use algo::critical_path::{CriticalPathReport, graph_critical_path};
pub use algo::dijkstra::{ShortestPathReport, graph_dijkstra};
pub use algo::flow::{FlowConservationReport, NodeLoss, VolumeFlowReport, graph_flow_conservation, graph_volume_flow};
pub use algo::reachability::{ReachabilityReport, graph_ancestors_descendants, graph_dynamic_reachability};
pub use algo::scc::graph_strongly_connected_components;
pub use algo::simple_paths::{AllSimplePathsReport, graph_all_simple_paths, graph_path_membership};
pub use algo::subgraph::{
    StrongSubgraph, Subgraph, graph_network_extraction, graph_strong_subgraphs, graph_subgraphs, graph_subgraphs_from_sources,
    graph_subgraphs_from_targets,
};
pub use algo::toposort::{TopoStep, TopologicalSortReport, graph_topological_sort};
pub use algo::traversal::{TraversalStep, TrackedDfsStep, graph_bfs, graph_dfs, graph_tracked_dfs};
pub use algo::type_stats::{
    PathStatisticsReport, TypeAggregateNodes, TypeAggregationReport, TypeStatisticsReport, TypeTransition, graph_missing_transitions,
    graph_path_statistics, graph_type_aggregation, graph_type_statistics,
};
pub use algo::validation::{ValidationReport, graph_validate};

/// Comparison tolerance for flow conservation and source/sink detection (§6).
pub const FLOW_TOLERANCE: f64 = 1e-3;

/// Hard guard on node count enforced by [`graph_validate`] (§4.10).
pub const MAX_NODES: usize = 1_000_000;

/// Hard guard on edge count enforced by [`graph_validate`] (§4.10).
pub const MAX_EDGES: usize = 5_000_000;
