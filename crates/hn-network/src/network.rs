//! Core network data structures.

use hn_core::{NodeId, PipeId, Real};
use hn_hydraulics::Material;

/// A junction in the pipe network.
///
/// Position is used only to derive pipe lengths; it has no hydraulic
/// meaning. Demand is signed: positive = consumption, negative =
/// supply/source. Internal unit is m3/s.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: Real,
    pub y: Real,
    pub demand_m3s: Real,
}

/// A directed pipe (section) between two nodes.
///
/// The `(start, end)` order defines the positive-flow convention: a positive
/// solved flow runs start -> end. Length is the Euclidean distance between
/// the endpoint positions, computed at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: PipeId,
    pub start: NodeId,
    pub end: NodeId,
    pub material: Material,
    pub diameter_m: Real,
    pub length_m: Real,
}

/// The network: a validated, immutable collection of nodes and pipes.
///
/// Nodes and pipes are stored sorted by id, so vector position doubles as
/// the solver index (rows/columns of the incidence system). The highest-id
/// node is the reference ("slack") node whose balance row is omitted.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) pipes: Vec<Pipe>,

    /// Per pipe: (start node index, end node index).
    pub(crate) pipe_ends: Vec<(usize, usize)>,

    /// Offsets for node->pipe adjacency: node i's incident pipes are
    /// node_pipes[node_pipe_offsets[i]..node_pipe_offsets[i+1]].
    pub(crate) node_pipe_offsets: Vec<usize>,

    /// Flat list of pipe indices incident to nodes.
    pub(crate) node_pipes: Vec<usize>,
}

impl Network {
    /// All nodes, sorted by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All pipes, sorted by id.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    /// Index of the reference (slack) node: last in sorted-id order.
    pub fn reference_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The reference node itself.
    pub fn reference_node(&self) -> &Node {
        &self.nodes[self.reference_index()]
    }

    /// Contiguous index for a node id.
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.binary_search_by_key(&id, |n| n.id).ok()
    }

    /// Contiguous index for a pipe id.
    pub fn pipe_index(&self, id: PipeId) -> Option<usize> {
        self.pipes.binary_search_by_key(&id, |p| p.id).ok()
    }

    /// (start, end) node indices of a pipe.
    pub fn pipe_endpoints(&self, pipe_idx: usize) -> (usize, usize) {
        self.pipe_ends[pipe_idx]
    }

    /// Pipe indices incident to a node.
    pub fn node_pipes(&self, node_idx: usize) -> &[usize] {
        let start = self.node_pipe_offsets[node_idx];
        let end = self.node_pipe_offsets[node_idx + 1];
        &self.node_pipes[start..end]
    }

    /// Number of independent loops for a connected network (first Betti
    /// number): pipes - nodes + 1.
    pub fn expected_loop_count(&self) -> usize {
        self.pipe_count() + 1 - self.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use hn_core::Id;

    fn two_node_net() -> Network {
        let mut b = NetworkBuilder::new();
        let n1 = b.add_node(1, 0.0, 0.0, -0.01);
        let n2 = b.add_node(2, 100.0, 0.0, 0.01);
        b.add_pipe(7, n1, n2, Material::Steel, 0.1);
        b.build().unwrap()
    }

    #[test]
    fn indices_follow_sorted_ids() {
        let net = two_node_net();
        assert_eq!(net.node_index(Id::new(1)), Some(0));
        assert_eq!(net.node_index(Id::new(2)), Some(1));
        assert_eq!(net.node_index(Id::new(99)), None);
        assert_eq!(net.pipe_index(Id::new(7)), Some(0));
    }

    #[test]
    fn reference_node_is_highest_id() {
        let net = two_node_net();
        assert_eq!(net.reference_node().id, Id::new(2));
    }

    #[test]
    fn pipe_length_is_euclidean() {
        let net = two_node_net();
        assert!((net.pipes()[0].length_m - 100.0).abs() < 1e-12);
    }

    #[test]
    fn adjacency_covers_both_endpoints() {
        let net = two_node_net();
        assert_eq!(net.node_pipes(0), &[0]);
        assert_eq!(net.node_pipes(1), &[0]);
        assert_eq!(net.pipe_endpoints(0), (0, 1));
    }
}
