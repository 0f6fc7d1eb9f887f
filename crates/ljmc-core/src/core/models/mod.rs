//! # Core Models Module
//!
//! Data structures describing the particles of a simulation.
//!
//! ## Key Components
//!
//! - [`particles`] - The ordered, capacity-bounded particle position store
//! - [`lattice`] - Generators for regular starting configurations
//!
//! ## Usage
//!
//! ```ignore
//! use ljmc::core::models::{lattice::fcc_lattice, particles::ParticleStore};
//!
//! let positions = fcc_lattice(108);
//! let store = ParticleStore::from_positions(positions, 256);
//! assert_eq!(store.len(), 108);
//! ```

pub mod lattice;
pub mod particles;
