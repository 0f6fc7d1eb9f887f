//! Provides input/output functionality for configuration snapshots.
//!
//! A snapshot is the ordered list of live particle positions; its row order is the particle
//! index order of the store. Files hold physical coordinates, the store holds box units, and the
//! readers and writers convert between the two using the box length.

pub mod snapshot;
pub mod traits;
