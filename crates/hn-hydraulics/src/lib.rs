//! hn-hydraulics: pure hydraulic formulas for pressurized pipe flow.
//!
//! Steady incompressible flow of water: velocity from volumetric flow,
//! Reynolds number, Colebrook-White friction factor, Darcy-Weisbach head
//! loss. All functions are total: invalid input (non-positive diameter or
//! length, non-finite flow) yields 0 rather than NaN, so a bad pipe never
//! poisons a whole solve.

pub mod formulas;
pub mod material;

pub use formulas::{friction_factor, head_loss, reynolds, velocity};
pub use material::Material;
