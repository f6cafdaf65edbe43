//! Check command implementation
//!
//! Validates the configuration and prints the resolved parameters without
//! running any trials.

use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig) -> Result<()> {
    info!("Checking configuration...");

    config.validate()?;
    let params = config.parameters()?;

    println!("Configuration OK");
    println!("  Horizon:              {} years", params.horizon_years());
    println!("  Trials:               {}", params.n_trials());
    println!("  Seed:                 {}", params.seed());
    println!(
        "  Leakage:              P_LEAK {:.2}, severity {:.2}, lag {}, mitigation {:.2}",
        params.leak_probability(),
        params.severity(),
        params.detection_lag(),
        params.mitigation()
    );
    println!(
        "  Triggers:             coverage < {:.2}, leverage > {:.2}, {} consecutive ({:?})",
        params.coverage_floor(),
        params.leverage_ceiling(),
        params.consecutive_breaches(),
        params.breach_rule()
    );
    println!("  Debt policy:          {:?}", params.debt_policy());
    println!(
        "  Sweep:                {} over {:?}",
        config.sweep.axis,
        config.sweep.resolved_values()
    );

    info!("Configuration check complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;

    #[test]
    fn test_default_config_passes() {
        assert!(run(&CliConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_parameters_fail() {
        let config = CliConfig::from_toml("[simulation]\nhorizon_years = 0\n").unwrap();
        assert!(matches!(run(&config), Err(CliError::Simulation(_))));
    }
}
