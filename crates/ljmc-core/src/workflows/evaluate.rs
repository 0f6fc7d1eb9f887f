use crate::core::forcefield::potentials::{LongRangeCorrection, pressure_delta};
use crate::core::forcefield::term::EnergyResult;
use crate::core::spatial::SpatialIndex;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::simulation::Simulation;
use nalgebra::Vector3;
use tracing::{info, instrument, warn};

/// Thermodynamic summary of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub n_particles: usize,
    pub box_length: f64,
    pub cutoff_radius: f64,
    pub density: f64,
    pub cells_per_side: usize,
    /// Cut (unshifted) potential energy and virial summed over pairs.
    pub energy: EnergyResult,
    pub long_range: LongRangeCorrection,
    pub pressure_delta: f64,
    pub temperature: Option<f64>,
}

impl EnergyReport {
    /// Potential energy per particle including the tail correction.
    pub fn potential_per_particle(&self) -> Option<f64> {
        if self.energy.overlap || self.n_particles == 0 {
            return None;
        }
        Some((self.energy.pot + self.long_range.pot) / self.n_particles as f64)
    }

    /// Configurational pressure `(W + W_lrc) / V`.
    pub fn virial_pressure(&self) -> Option<f64> {
        if self.energy.overlap {
            return None;
        }
        Some((self.energy.vir + self.long_range.vir) / self.box_length.powi(3))
    }

    /// Total pressure `ρT + (W + W_lrc) / V`; needs a temperature.
    pub fn pressure(&self) -> Option<f64> {
        let temperature = self.temperature?;
        Some(self.density * temperature + self.virial_pressure()?)
    }
}

/// Evaluates the energy of `positions` (box units) under `config`.
///
/// An overlapping configuration is not an error: the report carries `energy.overlap` and the
/// derived quantities return `None`.
#[instrument(skip_all, name = "evaluate_workflow")]
pub fn run(
    positions: Vec<Vector3<f64>>,
    config: &SimulationConfig,
    temperature: Option<f64>,
) -> Result<EnergyReport, EngineError> {
    info!(n = positions.len(), "Setting up simulation context.");
    let mut sim = Simulation::with_positions(*config, positions)?;
    sim.build_index()?;

    let energy = sim.system_energy()?;
    if energy.overlap {
        warn!("Configuration contains an overlapping pair.");
    }

    let density = sim.density();
    let report = EnergyReport {
        n_particles: sim.len(),
        box_length: config.box_length,
        cutoff_radius: config.cutoff_radius,
        density,
        cells_per_side: sim.index().cells_per_side(),
        energy,
        long_range: sim.long_range_correction(),
        pressure_delta: pressure_delta(density, config.cutoff_radius),
        temperature,
    };
    info!(
        pot = report.energy.pot,
        vir = report.energy.vir,
        "Energy evaluation complete."
    );
    Ok(report)
}
