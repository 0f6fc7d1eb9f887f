//! # ljmc Core Library
//!
//! The energy and particle-move kernel of a Monte Carlo simulator for a Lennard-Jones fluid in a
//! periodic cubic box, accelerated by a cell (link-list) decomposition.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the physics, the bookkeeping that keeps
//! the spatial index consistent, and the user-facing procedures stay separately testable.
//!
//! - **[`core`]: The Foundation.** Stateless pieces: the `EnergyResult` composite, the truncated
//!   Lennard-Jones pair terms and long-range corrections, periodic geometry, the `ParticleStore`,
//!   the `SpatialIndex` interface with its `CellList` implementation, and snapshot I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful `Simulation` context. It owns the particle store,
//!   the spatial index and the neighbor scratch buffer, and exposes single-particle energies,
//!   whole-system energies and the move/create/destroy mutations a Monte Carlo driver needs.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures such as evaluating the energy,
//!   virial and pressure of a stored configuration.
//!
//! The library never decides whether a trial move is accepted and never draws random numbers;
//! both belong to the driver calling into it.

pub mod core;
pub mod engine;
pub mod workflows;
