//! hn-core: stable foundation for hydronet.
//!
//! Contains:
//! - units (uom SI types + constructors for the boundary conversions)
//! - numeric (Real + float helpers)
//! - ids (stable external IDs for network objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HnError, HnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
