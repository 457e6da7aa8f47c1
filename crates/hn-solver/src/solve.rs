//! High-level solver interface.

use hn_core::Real;
use hn_network::{cycle_basis, Cycle, Network};
use tracing::{debug, info};

use crate::balance::{balance_loops, BalanceConfig, BalanceStatus, LoopDiagnostic};
use crate::error::SolverResult;
use crate::gauss::gauss_solve;
use crate::incidence::assemble;

/// Solver configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveConfig {
    pub balance: BalanceConfig,
}

/// A completed solve: per-pipe flows before and after loop correction, the
/// loop structure with closure diagnostics, and convergence info.
///
/// Flows are indexed like `Network::pipes()` (sorted by pipe id), signed
/// positive in the pipe's start -> end direction, in m3/s. The input network
/// is never mutated; a failed solve returns an error and leaves nothing
/// half-written.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Seed flows from the incidence system (mass-balanced, loop-blind).
    pub initial_flows_m3s: Vec<Real>,
    /// Flows after Hardy-Cross correction.
    pub flows_m3s: Vec<Real>,
    /// Fundamental loops, for mapping diagnostics back to pipes.
    pub cycles: Vec<Cycle>,
    /// Per-loop closure diagnostics from the final measurement pass.
    pub loops: Vec<LoopDiagnostic>,
    /// Outer balancing iterations performed.
    pub iterations: usize,
    /// False when the iteration cap was reached; the flows are then a
    /// best-effort partial result with residuals in `loops`.
    pub converged: bool,
}

/// Solve a network for its steady-state flow distribution.
///
/// Pipeline: incidence assembly -> Gaussian elimination (initial flows) ->
/// cycle basis -> Hardy-Cross loop balancing.
pub fn solve(network: &Network, config: &SolveConfig) -> SolverResult<Solution> {
    let (a, b) = assemble(network);
    let seed = gauss_solve(&a, &b)?;

    let cycles = cycle_basis(network);
    debug!(
        nodes = network.node_count(),
        pipes = network.pipe_count(),
        loops = cycles.len(),
        "network structure extracted"
    );

    let initial_flows_m3s: Vec<Real> = seed.iter().copied().collect();
    let mut flows_m3s = initial_flows_m3s.clone();
    let outcome = balance_loops(network, &cycles, &mut flows_m3s, &config.balance);
    let converged = outcome.status == BalanceStatus::Converged;

    info!(
        iterations = outcome.iterations,
        converged, "steady-state solve finished"
    );

    Ok(Solution {
        initial_flows_m3s,
        flows_m3s,
        cycles,
        loops: outcome.loops,
        iterations: outcome.iterations,
        converged,
    })
}
