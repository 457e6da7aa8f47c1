//! Error types for solver operations.

use hn_network::NetworkError;
use thiserror::Error;

/// Errors that can occur during network solving.
///
/// `NotConverged` is deliberately absent: reaching the iteration cap is a
/// diagnostic (`Solution::converged == false`), not a failure.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid topology: {0}")]
    Network(#[from] NetworkError),

    #[error("Singular system: row {row} reduces to 0 = {residual} (unsatisfiable demand set)")]
    SingularSystem { row: usize, residual: f64 },

    #[error("Shape mismatch: {what}")]
    Shape { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
