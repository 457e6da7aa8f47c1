//! hn-network: network/model layer for hydronet.
//!
//! Provides:
//! - Core network data structures (Node, Pipe, Network)
//! - Incremental network builder with topology validation
//! - Fundamental-cycle extraction for the loop-balancing solver
//!
//! # Example
//!
//! ```
//! use hn_hydraulics::Material;
//! use hn_network::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! let n1 = builder.add_node(1, 0.0, 0.0, -0.01);
//! let n2 = builder.add_node(2, 100.0, 0.0, 0.01);
//! builder.add_pipe(1, n1, n2, Material::Polyethylene, 0.1);
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.node_count(), 2);
//! assert_eq!(network.pipe_count(), 1);
//! ```

pub mod builder;
pub mod cycles;
pub mod error;
pub mod network;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use cycles::{cycle_basis, Cycle, SignedPipe};
pub use error::NetworkError;
pub use network::{Network, Node, Pipe};
