// hn-core/src/units.rs

use uom::si::f64::{Length as UomLength, VolumeRate as UomVolumeRate};

// Public canonical unit types (SI, f64).
//
// The solver itself works on bare `Real` values in fixed internal units
// (meters, m/s, m3/s, head in meters of water column); the uom types are for
// the boundary, where user input arrives in mixed units (L/s demands,
// millimeter catalog diameters).
pub type Length = UomLength;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn lps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_second;
    VolumeRate::new::<liter_per_second>(v)
}

pub mod constants {
    /// Standard gravity, m/s^2.
    pub const G_MPS2: f64 = 9.81;

    /// Kinematic viscosity of water at ~10 degC, m^2/s.
    pub const NU_WATER_M2PS: f64 = 1.31e-6;
}
