use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::evaluator::ForceError;
use crate::core::forcefield::parameterization::ParameterizationError;
use crate::core::topology::TopologyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid run parameters: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid topology: {source}")]
    Topology {
        #[from]
        source: TopologyError,
    },

    #[error("Force field parameterization failed: {source}")]
    Parameterization {
        #[from]
        source: ParameterizationError,
    },

    #[error("Force evaluation failed at step {step}: {source}")]
    Force { step: usize, source: ForceError },

    #[error("Kinetic energy became non-finite at step {step}")]
    NonFiniteKinetic { step: usize },

    #[error("Failed to write output at step {step}: {source}")]
    Output {
        step: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Inconsistent input: {0}")]
    Inconsistency(String),
}
