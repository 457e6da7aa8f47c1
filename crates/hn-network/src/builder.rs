//! Incremental network builder.

use std::collections::HashMap;

use hn_core::{NodeId, PipeId, Real};
use hn_hydraulics::Material;

use crate::error::NetworkError;
use crate::network::{Network, Node, Pipe};

/// Builder for constructing a network incrementally.
///
/// Use `add_node` and `add_pipe` to enter the design, then call `build()` to
/// validate the topology and freeze it into an immutable `Network`. Pipe
/// lengths are derived from node positions during `build()`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    pipes: Vec<PendingPipe>,
}

#[derive(Debug)]
struct PendingPipe {
    id: PipeId,
    start: NodeId,
    end: NodeId,
    material: Material,
    diameter_m: Real,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with position (meters) and signed demand (m3/s,
    /// positive = consumption). Returns its id for connecting pipes.
    pub fn add_node(&mut self, id: u32, x: Real, y: Real, demand_m3s: Real) -> NodeId {
        let id = NodeId::new(id);
        self.nodes.push(Node {
            id,
            x,
            y,
            demand_m3s,
        });
        id
    }

    /// Add a pipe from `start` to `end`; the order fixes the positive-flow
    /// convention. Returns the pipe id.
    pub fn add_pipe(
        &mut self,
        id: u32,
        start: NodeId,
        end: NodeId,
        material: Material,
        diameter_m: Real,
    ) -> PipeId {
        let id = PipeId::new(id);
        self.pipes.push(PendingPipe {
            id,
            start,
            end,
            material,
            diameter_m,
        });
        id
    }

    /// Validate the topology and freeze it into an immutable `Network`.
    pub fn build(self) -> Result<Network, NetworkError> {
        if self.nodes.len() < 2 {
            return Err(NetworkError::TooFewNodes {
                count: self.nodes.len(),
            });
        }
        if self.pipes.is_empty() {
            return Err(NetworkError::NoPipes);
        }

        let mut nodes = self.nodes;
        nodes.sort_by_key(|n| n.id);
        for pair in nodes.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(NetworkError::DuplicateNodeId { id: pair[0].id });
            }
        }

        let node_index = |id: NodeId| nodes.binary_search_by_key(&id, |n| n.id).ok();

        let mut pending = self.pipes;
        pending.sort_by_key(|p| p.id);
        for pair in pending.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(NetworkError::DuplicatePipeId { id: pair[0].id });
            }
        }

        // Resolve endpoints, reject self-loops and duplicate connections
        // (in either direction), derive lengths.
        let mut pipes = Vec::with_capacity(pending.len());
        let mut pipe_ends = Vec::with_capacity(pending.len());
        let mut seen_pairs: HashMap<(usize, usize), PipeId> = HashMap::new();

        for p in pending {
            let si = node_index(p.start).ok_or(NetworkError::UnknownNode {
                pipe: p.id,
                node: p.start,
            })?;
            let ei = node_index(p.end).ok_or(NetworkError::UnknownNode {
                pipe: p.id,
                node: p.end,
            })?;
            if si == ei {
                return Err(NetworkError::SelfLoop {
                    pipe: p.id,
                    node: p.start,
                });
            }
            if p.diameter_m <= 0.0 || !p.diameter_m.is_finite() {
                return Err(NetworkError::NonPositiveDiameter {
                    pipe: p.id,
                    diameter_m: p.diameter_m,
                });
            }

            let key = (si.min(ei), si.max(ei));
            if let Some(&existing) = seen_pairs.get(&key) {
                return Err(NetworkError::DuplicateConnection {
                    a: p.start,
                    b: p.end,
                    existing,
                });
            }
            seen_pairs.insert(key, p.id);

            let dx = nodes[ei].x - nodes[si].x;
            let dy = nodes[ei].y - nodes[si].y;
            pipes.push(Pipe {
                id: p.id,
                start: p.start,
                end: p.end,
                material: p.material,
                diameter_m: p.diameter_m,
                length_m: (dx * dx + dy * dy).sqrt(),
            });
            pipe_ends.push((si, ei));
        }

        let (node_pipe_offsets, node_pipes) = build_adjacency(nodes.len(), &pipe_ends);

        let network = Network {
            nodes,
            pipes,
            pipe_ends,
            node_pipe_offsets,
            node_pipes,
        };

        check_connected(&network)?;
        Ok(network)
    }
}

/// Build compact adjacency lists: for each node, its incident pipe indices.
fn build_adjacency(node_count: usize, pipe_ends: &[(usize, usize)]) -> (Vec<usize>, Vec<usize>) {
    let mut per_node: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (pipe_idx, &(si, ei)) in pipe_ends.iter().enumerate() {
        per_node[si].push(pipe_idx);
        per_node[ei].push(pipe_idx);
    }

    let mut offsets = Vec::with_capacity(node_count + 1);
    let mut flat = Vec::with_capacity(2 * pipe_ends.len());
    offsets.push(0);
    for list in per_node {
        flat.extend(list);
        offsets.push(flat.len());
    }
    (offsets, flat)
}

/// Reject disconnected networks: the cycle extractor runs one traversal from
/// a single start node, and a disconnected component with nonzero net demand
/// has no solution anyway.
fn check_connected(network: &Network) -> Result<(), NetworkError> {
    let n = network.node_count();
    let mut visited = vec![false; n];
    let mut stack = vec![0_usize];
    visited[0] = true;
    let mut reached = 1;

    while let Some(u) = stack.pop() {
        for &pipe_idx in network.node_pipes(u) {
            let (a, b) = network.pipe_endpoints(pipe_idx);
            let w = if a == u { b } else { a };
            if !visited[w] {
                visited[w] = true;
                reached += 1;
                stack.push(w);
            }
        }
    }

    if reached < n {
        return Err(NetworkError::Disconnected {
            start: network.nodes()[0].id,
            unreached: n - reached,
        });
    }
    Ok(())
}
