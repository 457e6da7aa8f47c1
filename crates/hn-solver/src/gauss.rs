//! Gaussian elimination with partial pivoting.

use hn_core::Real;
use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::error::{SolverError, SolverResult};

/// Pivots below this magnitude are treated as structurally zero.
pub const PIVOT_EPS: Real = 1e-12;

/// An eliminated row with coefficients below pivot tolerance but a right-hand
/// side above this marks the system inconsistent.
const RESIDUAL_EPS: Real = 1e-9;

/// Solve `A x = b` for a general (possibly rectangular or rank-deficient)
/// system.
///
/// Partial pivoting per column, pivot-row normalization, then elimination of
/// the pivot column from every other row, producing reduced row-echelon form
/// directly (no back-substitution pass). Columns without a usable pivot leave
/// their variable unconstrained at 0, which for looped networks yields one
/// particular solution of the under-determined node system - the seed for
/// loop balancing, not a final answer.
///
/// Returns `SingularSystem` when elimination leaves a row `0 = r` with
/// `|r| > 0`: the demand set cannot be satisfied by any flow assignment.
pub fn gauss_solve(a: &DMatrix<Real>, b: &DVector<Real>) -> SolverResult<DVector<Real>> {
    let (nrows, ncols) = a.shape();
    if b.len() != nrows {
        return Err(SolverError::Shape {
            what: format!("matrix has {} rows but rhs has {}", nrows, b.len()),
        });
    }

    let mut m = a.clone();
    let mut rhs = b.clone();

    // (pivot row, pivot column) pairs in elimination order.
    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut r = 0;

    for c in 0..ncols {
        if r >= nrows {
            break;
        }

        // Partial pivoting: largest |entry| in column c at or below row r.
        let mut best = r;
        for i in (r + 1)..nrows {
            if m[(i, c)].abs() > m[(best, c)].abs() {
                best = i;
            }
        }
        if m[(best, c)].abs() < PIVOT_EPS {
            trace!(column = c, "pivot below tolerance, variable left free");
            continue;
        }

        if best != r {
            m.swap_rows(r, best);
            rhs.swap_rows(r, best);
            trace!(row = r, with = best, "swapped pivot row");
        }

        let pivot = m[(r, c)];
        for k in c..ncols {
            m[(r, k)] /= pivot;
        }
        rhs[r] /= pivot;
        trace!(row = r, column = c, pivot, "normalized pivot row");

        // Full elimination: clear the pivot column from all other rows.
        for i in 0..nrows {
            if i == r {
                continue;
            }
            let factor = m[(i, c)];
            if factor.abs() < PIVOT_EPS {
                continue;
            }
            for k in c..ncols {
                m[(i, k)] -= factor * m[(r, k)];
            }
            rhs[i] -= factor * rhs[r];
        }

        pivots.push((r, c));
        r += 1;
    }

    // Rows that never produced a pivot have only sub-tolerance coefficients
    // left; a nonzero rhs there means 0 = r, no solution.
    for i in r..nrows {
        if rhs[i].abs() > RESIDUAL_EPS {
            return Err(SolverError::SingularSystem {
                row: i,
                residual: rhs[i],
            });
        }
    }

    let mut x = DVector::zeros(ncols);
    for (row, col) in pivots {
        x[col] = rhs[row];
    }
    Ok(x)
}
