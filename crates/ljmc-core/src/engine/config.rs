use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error(
        "Cutoff radius {cutoff_radius} exceeds half the box length {box_length}; minimum-image distances would be wrong"
    )]
    CutoffTooLarge { cutoff_radius: f64, box_length: f64 },

    #[error("Initial particle capacity must be at least 1")]
    ZeroCapacity,
}

/// Geometry and sizing of a simulation, in reduced units (σ = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub box_length: f64,
    pub cutoff_radius: f64,
    pub initial_capacity: usize,
}

impl SimulationConfig {
    /// Cutoff radius in box units.
    #[inline]
    pub fn reduced_cutoff(&self) -> f64 {
        self.cutoff_radius / self.box_length
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.box_length.powi(3)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("box_length", self.box_length),
            ("cutoff_radius", self.cutoff_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.reduced_cutoff() > 0.5 {
            return Err(ConfigError::CutoffTooLarge {
                cutoff_radius: self.cutoff_radius,
                box_length: self.box_length,
            });
        }
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    box_length: Option<f64>,
    cutoff_radius: Option<f64>,
    initial_capacity: Option<usize>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn box_length(mut self, length: f64) -> Self {
        self.box_length = Some(length);
        self
    }
    pub fn cutoff_radius(mut self, radius: f64) -> Self {
        self.cutoff_radius = Some(radius);
        self
    }
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let config = SimulationConfig {
            box_length: self
                .box_length
                .ok_or(ConfigError::MissingParameter("box_length"))?,
            cutoff_radius: self
                .cutoff_radius
                .ok_or(ConfigError::MissingParameter("cutoff_radius"))?,
            initial_capacity: self
                .initial_capacity
                .ok_or(ConfigError::MissingParameter("initial_capacity"))?,
        };
        config.validate()?;
        Ok(config)
    }
}
