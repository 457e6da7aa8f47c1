//! Hydraulic formulas: velocity, Reynolds number, friction factor, head loss.

use hn_core::units::constants::{G_MPS2, NU_WATER_M2PS};
use hn_core::Real;

use crate::material::Material;

/// Fixed iteration count for the Colebrook-White fixed-point solve.
///
/// No early-exit check: 100 iterations over-converges cheaply and keeps the
/// function branch-free for the solver's inner loop.
const COLEBROOK_ITERATIONS: usize = 100;

/// Initial friction factor guess for the Colebrook fixed point.
const LAMBDA_SEED: Real = 0.02;

/// Mean flow velocity in a circular pipe, m/s.
///
/// `velocity = 4|q| / (pi d^2)`. Returns 0 for non-positive diameter or
/// non-finite flow.
pub fn velocity(diameter_m: Real, flow_m3s: Real) -> Real {
    if diameter_m <= 0.0 || !flow_m3s.is_finite() {
        return 0.0;
    }
    4.0 * flow_m3s.abs() / (core::f64::consts::PI * diameter_m * diameter_m)
}

/// Reynolds number for water at ~10 degC (kinematic viscosity 1.31e-6 m^2/s).
///
/// Returns 0 for zero velocity so the no-flow case never propagates NaN.
pub fn reynolds(velocity_mps: Real, diameter_m: Real) -> Real {
    if velocity_mps <= 0.0 || diameter_m <= 0.0 {
        return 0.0;
    }
    velocity_mps * diameter_m / NU_WATER_M2PS
}

/// Darcy friction factor from the Colebrook-White equation.
///
/// Fixed-point form, iterated a fixed number of times:
/// `lambda <- 1 / (-2 log10(k/(3.7 d) + 2.51/(Re sqrt(lambda))))^2`
///
/// One correlation for both materials; the material only selects the
/// equivalent roughness `k`. Returns 0 for non-positive Reynolds number or
/// diameter (no flow, no friction loss).
pub fn friction_factor(reynolds: Real, diameter_m: Real, material: Material) -> Real {
    if reynolds <= 0.0 || diameter_m <= 0.0 {
        return 0.0;
    }
    let k = material.roughness_m();
    let mut lambda = LAMBDA_SEED;
    for _ in 0..COLEBROOK_ITERATIONS {
        let arg = k / (3.7 * diameter_m) + 2.51 / (reynolds * lambda.sqrt());
        let denom = -2.0 * arg.log10();
        lambda = 1.0 / (denom * denom);
    }
    lambda
}

/// Darcy-Weisbach head loss, meters of water column.
///
/// `h = lambda v^2 / (2g) * (L/d)`, g = 9.81 m/s^2. Returns 0 for
/// non-positive diameter/length or non-finite flow.
pub fn head_loss(diameter_m: Real, length_m: Real, flow_m3s: Real, lambda: Real) -> Real {
    if diameter_m <= 0.0 || length_m <= 0.0 || !flow_m3s.is_finite() {
        return 0.0;
    }
    let v = velocity(diameter_m, flow_m3s);
    lambda * v * v / (2.0 * G_MPS2) * (length_m / diameter_m)
}
