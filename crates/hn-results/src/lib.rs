//! hn-results: serializable solve reports.
//!
//! Turns a solver `Solution` plus its `Network` into flat, display-ready
//! records: per-pipe hydraulics, per-loop closure diagnostics, and the
//! overall convergence summary.

pub mod report;
pub mod types;

pub use report::aggregate;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
