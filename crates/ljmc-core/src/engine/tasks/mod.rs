pub mod pair_energy;
pub mod system_energy;
