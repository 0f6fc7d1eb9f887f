//! # Core Module
//!
//! The fundamental building blocks of the kernel: data models, the Lennard-Jones force field,
//! the spatial index, periodic geometry and configuration snapshot I/O.
//!
//! ## Architecture
//!
//! - **Particle Representation** ([`models`]) - The particle store and lattice generators
//! - **Energy Calculations** ([`forcefield`]) - Pair terms, the energy composite and tail corrections
//! - **Spatial Decomposition** ([`spatial`]) - The `SpatialIndex` interface and the cell list
//! - **Periodic Geometry** ([`utils`]) - Minimum-image and wrapping helpers
//! - **File I/O** ([`io`]) - Reading and writing configuration snapshots
//!
//! All coordinates inside the core are expressed in box units: the periodic box is the unit
//! cube centred on the origin and physical lengths are recovered by multiplying by the box length.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod spatial;
pub mod utils;
