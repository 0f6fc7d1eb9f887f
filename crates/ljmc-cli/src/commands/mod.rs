pub mod energy;
pub mod lattice;
