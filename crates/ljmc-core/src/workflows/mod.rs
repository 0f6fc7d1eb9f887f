//! # Workflows Module
//!
//! High-level procedures built on top of the [`crate::engine`] layer.
//!
//! ## Overview
//!
//! A workflow takes plain inputs (positions and a validated configuration), sets up a simulation
//! context, indexes it and returns a self-contained result. Drivers that only need numbers for a
//! stored configuration should start here rather than managing a `Simulation` directly.
//!
//! ## Architecture
//!
//! - **Evaluation Workflow** ([`evaluate`]) - Energy, virial, tail corrections and pressure of a
//!   single configuration.

pub mod evaluate;
