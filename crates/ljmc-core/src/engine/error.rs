use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Spatial index has not been built; call build_index() first")]
    IndexNotBuilt,

    #[error("Particle index {index} is out of range for {count} live particle(s)")]
    ParticleOutOfRange { index: usize, count: usize },

    #[error("Particle store is full at capacity {capacity}; grow() it before creating particles")]
    CapacityExceeded { capacity: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
