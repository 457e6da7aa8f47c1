//! Steady-state flow solver for looped water-distribution networks.
//!
//! The pipeline is: assemble the node-pipe incidence system, solve it by
//! Gaussian elimination for an initial mass-balanced flow distribution,
//! extract the fundamental loops, then run a Hardy-Cross relaxation that
//! redistributes flow around each loop until the signed head-loss sum of
//! every loop falls below tolerance.

pub mod balance;
pub mod error;
pub mod gauss;
pub mod incidence;
pub mod solve;

pub use balance::{balance_loops, BalanceConfig, BalanceOutcome, BalanceStatus, LoopDiagnostic};
pub use error::{SolverError, SolverResult};
pub use gauss::gauss_solve;
pub use incidence::assemble;
pub use solve::{solve, Solution, SolveConfig};
