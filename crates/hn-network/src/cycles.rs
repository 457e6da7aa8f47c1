//! Fundamental-cycle extraction.
//!
//! A depth-first spanning tree is grown from the lowest-id node; every pipe
//! left out of the tree is a chord, and each chord closes exactly one
//! fundamental loop: the tree path between its endpoints plus the chord
//! itself. Loop count for a connected network is pipes - nodes + 1.

use std::collections::HashMap;

use crate::network::Network;

/// A pipe inside a loop, with its traversal sign: +1 when the loop walks the
/// pipe in its start -> end direction, -1 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedPipe {
    /// Pipe index (position in `Network::pipes`).
    pub pipe: usize,
    pub sign: i8,
}

/// One fundamental loop: a closed walk of signed pipes, owned by one chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Index of the chord pipe that closes this loop.
    pub chord: usize,
    pub pipes: Vec<SignedPipe>,
}

/// Extract the fundamental cycle basis of a connected network.
///
/// The traversal is an explicit stack walk with parent-pointer tables, so
/// deep networks cannot overflow the call stack. The builder guarantees
/// connectivity, so every node is reached.
pub fn cycle_basis(network: &Network) -> Vec<Cycle> {
    let node_count = network.node_count();
    let pipe_count = network.pipe_count();

    // DFS spanning tree: parent node + connecting pipe per visited node.
    let mut visited = vec![false; node_count];
    let mut parent: Vec<Option<(usize, usize)>> = vec![None; node_count];
    let mut is_tree_edge = vec![false; pipe_count];

    let mut stack = vec![0_usize];
    visited[0] = true;
    while let Some(u) = stack.pop() {
        for &pipe_idx in network.node_pipes(u) {
            let (a, b) = network.pipe_endpoints(pipe_idx);
            let w = if a == u { b } else { a };
            if !visited[w] {
                visited[w] = true;
                parent[w] = Some((u, pipe_idx));
                is_tree_edge[pipe_idx] = true;
                stack.push(w);
            }
        }
    }

    // Unordered endpoint pair -> pipe index, for walking consecutive node
    // pairs back to pipes. Unique because duplicate connections are rejected
    // at build time.
    let mut edge_of: HashMap<(usize, usize), usize> = HashMap::with_capacity(pipe_count);
    for pipe_idx in 0..pipe_count {
        let (a, b) = network.pipe_endpoints(pipe_idx);
        edge_of.insert((a.min(b), a.max(b)), pipe_idx);
    }

    let ancestor_chain = |mut x: usize| -> Vec<usize> {
        let mut chain = vec![x];
        while let Some((p, _)) = parent[x] {
            x = p;
            chain.push(x);
        }
        chain
    };

    let mut cycles = Vec::new();
    for chord in (0..pipe_count).filter(|&p| !is_tree_edge[p]) {
        let (u, v) = network.pipe_endpoints(chord);

        // Lowest common ancestor: first node of u's chain that also sits on
        // v's chain. Both chains end at the DFS root, so one always exists.
        let chain_u = ancestor_chain(u);
        let chain_v = ancestor_chain(v);
        let lca = chain_u
            .iter()
            .copied()
            .find(|x| chain_v.contains(x))
            .expect("ancestor chains share the DFS root");

        // Closed walk: u -> lca -> v along the tree, then back to u over the
        // chord.
        let mut walk: Vec<usize> = Vec::new();
        for &x in &chain_u {
            walk.push(x);
            if x == lca {
                break;
            }
        }
        let down: Vec<usize> = chain_v.iter().copied().take_while(|&x| x != lca).collect();
        walk.extend(down.into_iter().rev());
        walk.push(u);

        let mut pipes = Vec::with_capacity(walk.len() - 1);
        for pair in walk.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let pipe_idx = edge_of[&(a.min(b), a.max(b))];
            let (start, _) = network.pipe_endpoints(pipe_idx);
            let sign = if start == a { 1 } else { -1 };
            pipes.push(SignedPipe {
                pipe: pipe_idx,
                sign,
            });
        }

        cycles.push(Cycle { chord, pipes });
    }

    cycles
}
