//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VerifyConfig;
use hsim_common::MAX_WIDTH;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "hsim.toml";

/// Loads and validates an `hsim.toml` configuration from a directory.
pub fn load_config(dir: &Path) -> Result<VerifyConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let content =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?;
    load_config_from_str(&content)
}

/// Parses and validates an `hsim.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<VerifyConfig, ConfigError> {
    let config: VerifyConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges the type system cannot express.
fn validate_config(config: &VerifyConfig) -> Result<(), ConfigError> {
    // The result channel is one bit wider than the operands and must fit a wire.
    if config.dut.width == 0 || config.dut.width >= MAX_WIDTH {
        return Err(ConfigError::invalid(
            "dut.width",
            format!("must be in 1..={}, got {}", MAX_WIDTH - 1, config.dut.width),
        ));
    }
    if config.run.reset_ticks == 0 {
        return Err(ConfigError::invalid("run.reset_ticks", "must be at least 1"));
    }
    if config.run.tick_limit == 0 {
        return Err(ConfigError::invalid("run.tick_limit", "must be at least 1"));
    }
    let mut seen = Vec::new();
    for kind in &config.run.scenarios {
        if seen.contains(kind) {
            return Err(ConfigError::invalid(
                "run.scenarios",
                format!("'{kind}' listed more than once"),
            ));
        }
        seen.push(*kind);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReleaseMode, ResetMode, ScenarioKind};

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.dut.width, 16);
        assert_eq!(config.run.scenarios, ScenarioKind::all());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[dut]
width = 8
reset = "clear-data"
valid_release = "never"

[clock]
frequency = "250MHz"

[run]
seed = 42
transactions = 10
hold_ticks = 5
reset_ticks = 2
tick_limit = 500
scenarios = ["random", "not-valid"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.dut.width, 8);
        assert_eq!(config.dut.reset, ResetMode::ClearData);
        assert_eq!(config.dut.valid_release, ReleaseMode::Never);
        assert_eq!(config.clock.frequency.period_fs(), 4_000_000);
        assert_eq!(config.run.seed, 42);
        assert_eq!(config.run.transactions, 10);
        assert_eq!(config.run.hold_ticks, 5);
        assert_eq!(config.run.reset_ticks, 2);
        assert_eq!(config.run.tick_limit, 500);
        assert_eq!(
            config.run.scenarios,
            vec![ScenarioKind::Random, ScenarioKind::NotValid]
        );
    }

    #[test]
    fn width_zero_rejected() {
        let err = load_config_from_str("[dut]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn width_too_wide_rejected() {
        let err = load_config_from_str("[dut]\nwidth = 64\n").unwrap_err();
        assert_eq!(err.to_string(), "invalid `dut.width`: must be in 1..=63, got 64");
        assert!(load_config_from_str("[dut]\nwidth = 63\n").is_ok());
    }

    #[test]
    fn zero_reset_ticks_rejected() {
        let err = load_config_from_str("[run]\nreset_ticks = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn duplicate_scenario_rejected() {
        let err =
            load_config_from_str("[run]\nscenarios = [\"reset\", \"reset\"]\n").unwrap_err();
        assert!(err.to_string().contains("'reset' listed more than once"));
    }

    #[test]
    fn unknown_scenario_is_parse_error() {
        let err = load_config_from_str("[run]\nscenarios = [\"overflow\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = load_config_from_str("[dut]\nwidht = 8\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[dut]\nwidth = 4\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.dut.width, 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
