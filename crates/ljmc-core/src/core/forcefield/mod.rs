//! # Force Field Module
//!
//! The truncated Lennard-Jones potential in reduced units (σ = ε = 1).
//!
//! ## Key Components
//!
//! - [`term`] - The `EnergyResult` composite with its infectious overlap flag
//! - [`potentials`] - Pair terms, the hard-core overlap threshold and analytic tail corrections
//!
//! Pair terms are accumulated unscaled inside the kernel and multiplied by the 4ε energy and
//! 24ε/3 virial prefactors once per evaluation.

pub mod potentials;
pub mod term;
