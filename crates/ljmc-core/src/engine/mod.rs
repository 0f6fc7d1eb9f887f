//! # Engine Module
//!
//! The stateful layer of the kernel. It owns a particle store together with the spatial index
//! that accelerates neighbor searches, and keeps the two synchronized as particles move, appear
//! and disappear.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Box length, cutoff and capacity, validated up front
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Neighbor Enumeration** ([`neighbors`]) - Half- and full-shell cell stencils
//! - **Simulation Context** ([`simulation`]) - Energies and the move/create/destroy mutations
//! - **Tasks** (`tasks`) - The pair energy kernel and the system energy aggregator
//!
//! ## Usage
//!
//! ```ignore
//! use ljmc::engine::config::SimulationConfigBuilder;
//! use ljmc::engine::neighbors::SearchMode;
//! use ljmc::engine::simulation::Simulation;
//!
//! let config = SimulationConfigBuilder::new()
//!     .box_length(10.0)
//!     .cutoff_radius(2.5)
//!     .initial_capacity(256)
//!     .build()?;
//! let mut sim = Simulation::with_positions(config, positions)?;
//! sim.build_index()?;
//!
//! let total = sim.system_energy()?;
//! let old = sim.pair_energy(&sim.position(i)?, i, SearchMode::Full)?;
//! let new = sim.pair_energy(&trial, i, SearchMode::Full)?;
//! if accept(old, new) {
//!     sim.move_particle(i, trial)?;
//! }
//! ```
//!
//! The engine is single-threaded: every operation that reads the neighbor scratch buffer or
//! modifies the index takes `&mut self`, so the borrow checker serializes mutations against
//! energy evaluations.

pub mod config;
pub mod error;
pub mod neighbors;
pub mod simulation;
pub(crate) mod tasks;
