//! Assemble a `SolveReport` from a solved network.

use hn_hydraulics::{friction_factor, head_loss, reynolds, velocity};
use hn_network::Network;
use hn_solver::Solution;

use crate::types::{LoopResult, PipeResult, SignedPipeRef, SolveReport};

/// Build the display-ready report for a completed solve.
///
/// Per-pipe hydraulics are recomputed from the final flows so the report is
/// self-consistent even when the solve stopped at the iteration cap.
pub fn aggregate(network: &Network, solution: &Solution) -> SolveReport {
    let pipes = network
        .pipes()
        .iter()
        .enumerate()
        .map(|(i, pipe)| {
            let flow = solution.flows_m3s[i];
            let v = velocity(pipe.diameter_m, flow);
            let re = reynolds(v, pipe.diameter_m);
            let lambda = friction_factor(re, pipe.diameter_m, pipe.material);
            PipeResult {
                pipe_id: pipe.id.raw(),
                start_node: pipe.start.raw(),
                end_node: pipe.end.raw(),
                initial_flow_m3s: solution.initial_flows_m3s[i],
                flow_m3s: flow,
                velocity_mps: v,
                reynolds: re,
                friction_factor: lambda,
                head_loss_m: head_loss(pipe.diameter_m, pipe.length_m, flow, lambda),
            }
        })
        .collect();

    let loops = solution
        .loops
        .iter()
        .map(|diag| {
            let cycle = &solution.cycles[diag.cycle];
            LoopResult {
                pipes: cycle
                    .pipes
                    .iter()
                    .map(|sp| SignedPipeRef {
                        pipe_id: network.pipes()[sp.pipe].id.raw(),
                        sign: sp.sign,
                    })
                    .collect(),
                discrepancy_m: diag.discrepancy_m,
                within_tolerance: diag.within_tolerance,
                degenerate: diag.degenerate,
            }
        })
        .collect();

    SolveReport {
        pipes,
        loops,
        iterations: solution.iterations,
        converged: solution.converged,
    }
}
