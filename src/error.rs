//! Structured error type for the procedures in this crate.
//!
//! Per the error-handling contract: unknown source ids and dangling edges
//! are *not* errors (they yield empty output or get reported as data), only
//! malformed call arguments and oversized inputs are.

use thiserror::Error;

/// Error surfaced by a `graph_*` procedure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A required argument was missing or empty (e.g. an empty type filter
    /// where the contract requires at least one type).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input graph exceeds the hard memory-safety limits in
    /// [`crate::MAX_NODES`] / [`crate::MAX_EDGES`].
    #[error("input too large: {nodes} nodes (max {max_nodes}), {edges} edges (max {max_edges})")]
    InputTooLarge {
        nodes: usize,
        edges: usize,
        max_nodes: usize,
        max_edges: usize,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;
