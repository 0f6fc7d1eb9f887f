use crate::cli::EnergyArgs;
use crate::error::{CliError, Result};
use ljmc::engine::config::{SimulationConfig, SimulationConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSystemConfig {
    #[serde(rename = "box-length")]
    box_length: Option<f64>,
    cutoff: Option<f64>,
    #[serde(rename = "initial-capacity")]
    initial_capacity: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialStateConfig {
    temperature: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialLatticeConfig {
    particles: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    system: Option<PartialSystemConfig>,
    state: Option<PartialStateConfig>,
    lattice: Option<PartialLatticeConfig>,
}

/// Settings for one `energy` invocation after merging the file with command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub box_length: f64,
    pub cutoff_radius: f64,
    pub initial_capacity: Option<usize>,
    pub temperature: Option<f64>,
    pub lattice_particles: Option<usize>,
}

impl RunSettings {
    /// Builds the engine configuration for `n_particles` particles.
    ///
    /// Without an explicit `system.initial-capacity` the capacity is the particle count.
    pub fn simulation_config(&self, n_particles: usize) -> Result<SimulationConfig> {
        SimulationConfigBuilder::new()
            .box_length(self.box_length)
            .cutoff_radius(self.cutoff_radius)
            .initial_capacity(self.initial_capacity.unwrap_or(n_particles.max(1)))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn merge_with_cli(mut self, args: &EnergyArgs) -> Result<RunSettings> {
        self.apply_set_values(&args.set_values)?;

        let system = self.system.take().unwrap_or_default();
        let state = self.state.take().unwrap_or_default();
        let lattice = self.lattice.take().unwrap_or_default();

        let box_length = args.box_length.or(system.box_length).ok_or_else(|| {
            CliError::Config("`system.box-length` is required.".to_string())
        })?;
        let cutoff_radius = args
            .cutoff
            .or(system.cutoff)
            .ok_or_else(|| CliError::Config("`system.cutoff` is required.".to_string()))?;

        if let Some(temperature) = args.temperature.or(state.temperature) {
            if !(temperature.is_finite() && temperature > 0.0) {
                return Err(CliError::Config(format!(
                    "`state.temperature` must be positive, got {}",
                    temperature
                )));
            }
        }

        Ok(RunSettings {
            box_length,
            cutoff_radius,
            initial_capacity: system.initial_capacity,
            temperature: args.temperature.or(state.temperature),
            lattice_particles: args.particles.or(lattice.particles),
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "system.box-length" => {
                    self.system.get_or_insert_with(Default::default).box_length =
                        Some(parse_value(key, value_str)?);
                }
                "system.cutoff" => {
                    self.system.get_or_insert_with(Default::default).cutoff =
                        Some(parse_value(key, value_str)?);
                }
                "system.initial-capacity" => {
                    self.system
                        .get_or_insert_with(Default::default)
                        .initial_capacity = Some(parse_value(key, value_str)?);
                }
                "state.temperature" => {
                    self.state.get_or_insert_with(Default::default).temperature =
                        Some(parse_value(key, value_str)?);
                }
                "lattice.particles" => {
                    self.lattice.get_or_insert_with(Default::default).particles =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}
