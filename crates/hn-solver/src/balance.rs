//! Hardy-Cross loop balancing.
//!
//! The initial flows from the incidence system satisfy nodal mass balance
//! but not loop energy balance. Each fundamental loop is corrected by a flow
//! shift derived from the first-order linearization of the Darcy-Weisbach
//! law; shifting the same amount around a closed loop preserves every node
//! balance, so the two constraint families never fight.

use hn_core::Real;
use hn_hydraulics::{friction_factor, head_loss, reynolds, velocity};
use hn_network::{Cycle, Network, Pipe};
use tracing::{debug, trace, warn};

/// Loop-balancing configuration.
#[derive(Debug, Clone, Copy)]
pub struct BalanceConfig {
    /// A loop is balanced when its |signed head-loss sum| is below this, m.
    pub tolerance_m: Real,
    /// Outer iteration cap; reaching it is a diagnostic, not an error.
    pub max_iterations: usize,
    /// Pipes with |flow| below this are skipped in the correction
    /// denominator (their head-loss sensitivity is undefined at zero flow).
    pub min_flow_m3s: Real,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            tolerance_m: 0.5,
            max_iterations: 100,
            min_flow_m3s: 1e-9,
        }
    }
}

/// Terminal state of the relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    /// Every loop within tolerance in the same iteration.
    Converged,
    /// Iteration cap reached; residual discrepancies are in the diagnostics.
    MaxIterationsReached,
}

/// Closure diagnostic for one loop, from the last measurement pass.
#[derive(Debug, Clone)]
pub struct LoopDiagnostic {
    /// Index into the cycle list this diagnostic describes.
    pub cycle: usize,
    /// Signed head-loss sum around the loop, m.
    pub discrepancy_m: Real,
    pub within_tolerance: bool,
    /// Loop had zero flow-weighted sensitivity and was skipped rather than
    /// corrected (the DegenerateLoop guard).
    pub degenerate: bool,
}

/// Result of the relaxation: terminal state, iteration count, and per-loop
/// closure diagnostics.
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    pub status: BalanceStatus,
    pub iterations: usize,
    pub loops: Vec<LoopDiagnostic>,
}

/// Head loss of a pipe at the given flow, m (always non-negative).
fn pipe_head_loss(pipe: &Pipe, flow_m3s: Real) -> Real {
    let v = velocity(pipe.diameter_m, flow_m3s);
    let re = reynolds(v, pipe.diameter_m);
    let lambda = friction_factor(re, pipe.diameter_m, pipe.material);
    head_loss(pipe.diameter_m, pipe.length_m, flow_m3s, lambda)
}

/// Signed head-loss sum around a loop: each pipe contributes its head loss
/// oriented by its flow direction and by the loop traversal sign.
fn loop_discrepancy(network: &Network, cycle: &Cycle, flows: &[Real]) -> Real {
    cycle
        .pipes
        .iter()
        .map(|sp| {
            let q = flows[sp.pipe];
            let h = pipe_head_loss(&network.pipes()[sp.pipe], q);
            Real::from(sp.sign) * h * q.signum()
        })
        .sum()
}

/// Flow-weighted head-loss sensitivity of a loop: sum of h_i/|q_i| over its
/// pipes, skipping (near-)zero flows.
fn loop_sensitivity(network: &Network, cycle: &Cycle, flows: &[Real], min_flow: Real) -> Real {
    cycle
        .pipes
        .iter()
        .filter_map(|sp| {
            let q = flows[sp.pipe];
            if q.abs() < min_flow {
                return None;
            }
            let h = pipe_head_loss(&network.pipes()[sp.pipe], q);
            Some(h / q.abs())
        })
        .sum()
}

/// Run the Hardy-Cross relaxation, correcting `flows` in place.
///
/// Loops are corrected sequentially within one outer iteration: each loop's
/// discrepancy is recomputed from the current flows when its turn comes, so
/// pipes shared between loops are always seen consistently. Convergence is
/// judged by a separate measurement pass at the top of each iteration, which
/// is also what gives a loop-free (tree) network its zero-iteration result.
pub fn balance_loops(
    network: &Network,
    cycles: &[Cycle],
    flows: &mut [Real],
    config: &BalanceConfig,
) -> BalanceOutcome {
    if cycles.is_empty() {
        return BalanceOutcome {
            status: BalanceStatus::Converged,
            iterations: 0,
            loops: Vec::new(),
        };
    }

    let mut iterations = 0;
    loop {
        // Measurement pass: fresh head losses for every loop.
        let diagnostics: Vec<LoopDiagnostic> = cycles
            .iter()
            .enumerate()
            .map(|(i, cycle)| {
                let discrepancy_m = loop_discrepancy(network, cycle, flows);
                let within_tolerance = discrepancy_m.abs() <= config.tolerance_m;
                let degenerate = !within_tolerance
                    && loop_sensitivity(network, cycle, flows, config.min_flow_m3s) <= 0.0;
                LoopDiagnostic {
                    cycle: i,
                    discrepancy_m,
                    within_tolerance,
                    degenerate,
                }
            })
            .collect();

        if diagnostics.iter().all(|d| d.within_tolerance) {
            debug!(iterations, "loop balancing converged");
            return BalanceOutcome {
                status: BalanceStatus::Converged,
                iterations,
                loops: diagnostics,
            };
        }
        if iterations >= config.max_iterations {
            warn!(
                iterations,
                "iteration cap reached with unbalanced loops, returning partial result"
            );
            return BalanceOutcome {
                status: BalanceStatus::MaxIterationsReached,
                iterations,
                loops: diagnostics,
            };
        }
        iterations += 1;

        // Correction pass, sequential per loop.
        for (i, cycle) in cycles.iter().enumerate() {
            let discrepancy = loop_discrepancy(network, cycle, flows);
            if discrepancy.abs() <= config.tolerance_m {
                continue;
            }

            let sensitivity = loop_sensitivity(network, cycle, flows, config.min_flow_m3s);
            if sensitivity <= 0.0 {
                debug!(cycle = i, discrepancy, "degenerate loop skipped");
                continue;
            }

            let dq = -discrepancy / (2.0 * sensitivity);
            for sp in &cycle.pipes {
                flows[sp.pipe] += dq * Real::from(sp.sign);
            }
            trace!(cycle = i, discrepancy, dq, "applied loop correction");
        }
        debug!(iteration = iterations, "completed correction pass");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_hydraulics::Material;
    use hn_network::{cycle_basis, NetworkBuilder};

    fn square_100m() -> Network {
        let mut b = NetworkBuilder::new();
        let n1 = b.add_node(1, 0.0, 0.0, -0.01);
        let n2 = b.add_node(2, 0.0, 100.0, 0.0033);
        let n3 = b.add_node(3, 100.0, 100.0, 0.0033);
        let n4 = b.add_node(4, 100.0, 0.0, 0.0034);
        b.add_pipe(1, n1, n2, Material::Polyethylene, 0.1);
        b.add_pipe(2, n2, n3, Material::Polyethylene, 0.1);
        b.add_pipe(3, n3, n4, Material::Polyethylene, 0.1);
        b.add_pipe(4, n4, n1, Material::Polyethylene, 0.1);
        b.build().unwrap()
    }

    #[test]
    fn no_loops_means_zero_iterations() {
        let net = square_100m();
        let mut flows = vec![0.01, 0.0067, 0.0034, 0.0];
        let outcome = balance_loops(&net, &[], &mut flows, &BalanceConfig::default());
        assert_eq!(outcome.status, BalanceStatus::Converged);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(flows, vec![0.01, 0.0067, 0.0034, 0.0]);
    }

    #[test]
    fn unbalanced_square_converges() {
        let net = square_100m();
        let cycles = cycle_basis(&net);
        assert_eq!(cycles.len(), 1);

        // Tree-seeded flows: the chord carries nothing, so the loop starts
        // far out of balance.
        let mut flows = vec![0.01, 0.0067, 0.0034, 0.0];
        let config = BalanceConfig::default();
        let outcome = balance_loops(&net, &cycles, &mut flows, &config);

        assert_eq!(outcome.status, BalanceStatus::Converged);
        assert!(outcome.iterations > 0);
        assert!(outcome.iterations <= config.max_iterations);
        for d in &outcome.loops {
            assert!(d.within_tolerance);
            assert!(d.discrepancy_m.abs() <= config.tolerance_m);
        }
    }

    #[test]
    fn corrections_preserve_node_balance() {
        let net = square_100m();
        let cycles = cycle_basis(&net);
        let mut flows = vec![0.01, 0.0067, 0.0034, 0.0];

        let net_inflow = |flows: &[Real], node_idx: usize| -> Real {
            net.node_pipes(node_idx)
                .iter()
                .map(|&p| {
                    let (_, e) = net.pipe_endpoints(p);
                    if e == node_idx { flows[p] } else { -flows[p] }
                })
                .sum()
        };

        let before: Vec<Real> = (0..net.node_count()).map(|i| net_inflow(&flows, i)).collect();
        balance_loops(&net, &cycles, &mut flows, &BalanceConfig::default());
        let after: Vec<Real> = (0..net.node_count()).map(|i| net_inflow(&flows, i)).collect();

        for (b, a) in before.iter().zip(&after) {
            assert!((b - a).abs() < 1e-12, "balance drifted: {b} -> {a}");
        }
    }

    #[test]
    fn all_zero_flows_is_degenerate_not_fatal() {
        // A loop fed only zero flows has zero sensitivity; with demands that
        // cannot push it past tolerance the loop simply reports balanced,
        // and with a tolerance of zero it reports degenerate but never
        // panics or divides by zero.
        let net = square_100m();
        let cycles = cycle_basis(&net);
        let mut flows = vec![0.0; 4];
        let config = BalanceConfig {
            tolerance_m: 0.5,
            max_iterations: 10,
            min_flow_m3s: 1e-9,
        };
        let outcome = balance_loops(&net, &cycles, &mut flows, &config);
        assert_eq!(outcome.status, BalanceStatus::Converged);
        assert_eq!(flows, vec![0.0; 4]);
    }

    #[test]
    fn iteration_cap_is_reported_not_fatal() {
        let net = square_100m();
        let cycles = cycle_basis(&net);
        let mut flows = vec![0.01, 0.0067, 0.0034, 0.0];
        // Impossible tolerance forces the cap.
        let config = BalanceConfig {
            tolerance_m: 0.0,
            max_iterations: 5,
            min_flow_m3s: 1e-9,
        };
        let outcome = balance_loops(&net, &cycles, &mut flows, &config);
        assert_eq!(outcome.status, BalanceStatus::MaxIterationsReached);
        assert_eq!(outcome.iterations, 5);
        assert_eq!(outcome.loops.len(), 1);
        assert!(flows.iter().all(|q| q.is_finite()));
    }
}
