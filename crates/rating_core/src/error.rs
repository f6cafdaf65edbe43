//! Error types for the downgrade model.
//!
//! Only parameter problems are errors. Numeric degeneracies inside a
//! simulated year are recorded on the year itself (see
//! [`RatioStatus`](crate::types::RatioStatus)) and never abort a run.

use thiserror::Error;

/// Errors raised while configuring a simulation.
///
/// All variants are produced before any path is simulated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A configured value violates its declared invariant.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the violated invariant.
        reason: String,
    },

    /// The sweep value list is empty or unusable.
    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias for model configuration.
pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = SimulationError::invalid("leak_probability", "must be in [0, 1], got 1.5");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'leak_probability': must be in [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_invalid_sweep_display() {
        let err = SimulationError::InvalidSweep("no values supplied".to_string());
        assert_eq!(err.to_string(), "Invalid sweep: no values supplied");
    }
}
