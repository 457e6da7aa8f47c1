//! Network-specific error types.

use hn_core::{NodeId, PipeId};
use thiserror::Error;

/// Topology errors raised while building a network.
///
/// These are the `InvalidTopology` family: every variant means the entered
/// node/pipe lists cannot describe a solvable network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Duplicate node id {id}")]
    DuplicateNodeId { id: NodeId },

    #[error("Duplicate pipe id {id}")]
    DuplicatePipeId { id: PipeId },

    #[error("Pipe {pipe} references non-existent node {node}")]
    UnknownNode { pipe: PipeId, node: NodeId },

    #[error("Pipe {pipe} connects node {node} to itself")]
    SelfLoop { pipe: PipeId, node: NodeId },

    #[error("Nodes {a} and {b} are already connected (pipe {existing})")]
    DuplicateConnection {
        a: NodeId,
        b: NodeId,
        existing: PipeId,
    },

    #[error("Pipe {pipe} has non-positive diameter {diameter_m} m")]
    NonPositiveDiameter { pipe: PipeId, diameter_m: f64 },

    #[error("Network needs at least 2 nodes, got {count}")]
    TooFewNodes { count: usize },

    #[error("Network has no pipes")]
    NoPipes,

    #[error("Network is disconnected: {unreached} node(s) unreachable from node {start}")]
    Disconnected { start: NodeId, unreached: usize },
}
