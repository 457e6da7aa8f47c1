//! Result data types.

use serde::{Deserialize, Serialize};

use crate::ResultsResult;

/// Hydraulic state of one pipe after a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeResult {
    pub pipe_id: u32,
    pub start_node: u32,
    pub end_node: u32,
    /// Seed flow from the incidence system, m3/s.
    pub initial_flow_m3s: f64,
    /// Corrected flow, m3/s, positive in the start -> end direction.
    pub flow_m3s: f64,
    pub velocity_mps: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    /// Friction head loss magnitude, m.
    pub head_loss_m: f64,
}

/// One pipe's membership in a loop, with its traversal sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignedPipeRef {
    pub pipe_id: u32,
    pub sign: i8,
}

/// Closure diagnostic for one fundamental loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopResult {
    pub pipes: Vec<SignedPipeRef>,
    /// Signed head-loss sum around the loop, m.
    pub discrepancy_m: f64,
    pub within_tolerance: bool,
    pub degenerate: bool,
}

/// Complete report of one steady-state solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub pipes: Vec<PipeResult>,
    pub loops: Vec<LoopResult>,
    pub iterations: usize,
    pub converged: bool,
}

impl SolveReport {
    pub fn to_json(&self) -> ResultsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
