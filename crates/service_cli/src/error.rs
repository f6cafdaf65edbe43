//! CLI error types.

use rating_core::SimulationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `downgrade-risk` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Model parameters or sweep values were rejected
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// Output file path is unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// CSV serialisation failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_error_converts() {
        let err: CliError = SimulationError::invalid("severity", "must be non-negative").into();
        assert!(matches!(err, CliError::Simulation(_)));
        assert!(err.to_string().contains("severity"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: CliError = ConfigError::Parse("bad toml".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: Parse error: bad toml");
    }
}
