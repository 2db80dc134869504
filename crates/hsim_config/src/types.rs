//! Configuration types deserialized from `hsim.toml`.

use hsim_common::Frequency;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// The top-level verification configuration parsed from `hsim.toml`.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// The adder under test.
    #[serde(default)]
    pub dut: DutConfig,
    /// The shared clock.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Scenario selection and parameters.
    #[serde(default)]
    pub run: RunConfig,
}

/// Parameters of the adder under test.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DutConfig {
    /// Operand width W; the result channel is W+1 bits wide.
    #[serde(default = "default_width")]
    pub width: u32,
    /// What the synchronous reset clears.
    #[serde(default)]
    pub reset: ResetMode,
    /// When the result valid flag falls.
    #[serde(default)]
    pub valid_release: ReleaseMode,
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            reset: ResetMode::default(),
            valid_release: ReleaseMode::default(),
        }
    }
}

fn default_width() -> u32 {
    16
}

/// What the adder's synchronous reset clears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetMode {
    /// Reset clears both the result data and the result valid flag.
    #[default]
    ClearAll,
    /// Reset clears only the result data; valid keeps its latched value.
    ClearData,
}

/// When the adder drops its result valid flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseMode {
    /// Valid falls once the held result is accepted and no new operands arrive.
    #[default]
    OnConsume,
    /// Valid never falls once set (except through reset).
    Never,
}

/// Clock settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    /// Clock frequency, e.g. `"100MHz"`. Used to render tick timestamps.
    #[serde(default, deserialize_with = "deserialize_frequency")]
    pub frequency: Frequency,
}

/// Scenario selection and run parameters.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Seed for the operand generator; runs with the same seed reproduce.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of operand pairs streamed by the throughput scenarios.
    #[serde(default = "default_transactions")]
    pub transactions: usize,
    /// Number of ticks the hold scenarios keep their condition asserted.
    #[serde(default = "default_hold_ticks")]
    pub hold_ticks: u64,
    /// Number of ticks reset is held high before every scenario.
    #[serde(default = "default_reset_ticks")]
    pub reset_ticks: u64,
    /// Upper bound on ticks any single scenario may run.
    #[serde(default = "default_tick_limit")]
    pub tick_limit: u64,
    /// Scenarios to run, in order. Defaults to all of them.
    #[serde(default = "ScenarioKind::all")]
    pub scenarios: Vec<ScenarioKind>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            transactions: default_transactions(),
            hold_ticks: default_hold_ticks(),
            reset_ticks: default_reset_ticks(),
            tick_limit: default_tick_limit(),
            scenarios: ScenarioKind::all(),
        }
    }
}

fn default_seed() -> u64 {
    1
}

fn default_transactions() -> usize {
    100
}

fn default_hold_ticks() -> u64 {
    20
}

fn default_reset_ticks() -> u64 {
    3
}

fn default_tick_limit() -> u64 {
    100_000
}

/// The canonical verification scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Back-to-back random operand pairs with the result always ready.
    Random,
    /// Reset held high keeps the result at zero.
    Reset,
    /// Result not ready keeps every transfer blocked.
    NotReady,
    /// One operand invalid suppresses the result, then the stream resumes.
    NotValid,
    /// Random result stalls: one output per accepted operand pair, in order.
    Backpressure,
}

impl ScenarioKind {
    /// Every scenario, in the default run order.
    pub fn all() -> Vec<ScenarioKind> {
        vec![
            ScenarioKind::Random,
            ScenarioKind::Reset,
            ScenarioKind::NotReady,
            ScenarioKind::NotValid,
            ScenarioKind::Backpressure,
        ]
    }

    /// The name used in `hsim.toml` and in reports.
    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Random => "random",
            ScenarioKind::Reset => "reset",
            ScenarioKind::NotReady => "not-ready",
            ScenarioKind::NotValid => "not-valid",
            ScenarioKind::Backpressure => "backpressure",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VerifyConfig::default();
        assert_eq!(config.dut.width, 16);
        assert_eq!(config.dut.reset, ResetMode::ClearAll);
        assert_eq!(config.dut.valid_release, ReleaseMode::OnConsume);
        assert_eq!(config.clock.frequency.period_fs(), 10_000_000);
        assert_eq!(config.run.transactions, 100);
        assert_eq!(config.run.hold_ticks, 20);
        assert_eq!(config.run.reset_ticks, 3);
        assert_eq!(config.run.scenarios.len(), 5);
    }

    #[test]
    fn reset_mode_variants() {
        #[derive(Deserialize)]
        struct W {
            m: ResetMode,
        }
        let w: W = toml::from_str(r#"m = "clear-data""#).unwrap();
        assert_eq!(w.m, ResetMode::ClearData);
        let w: W = toml::from_str(r#"m = "clear-all""#).unwrap();
        assert_eq!(w.m, ResetMode::ClearAll);
        assert!(toml::from_str::<W>(r#"m = "clear-nothing""#).is_err());
    }

    #[test]
    fn release_mode_variants() {
        #[derive(Deserialize)]
        struct W {
            m: ReleaseMode,
        }
        let w: W = toml::from_str(r#"m = "never""#).unwrap();
        assert_eq!(w.m, ReleaseMode::Never);
        let w: W = toml::from_str(r#"m = "on-consume""#).unwrap();
        assert_eq!(w.m, ReleaseMode::OnConsume);
    }

    #[test]
    fn scenario_names_roundtrip() {
        for kind in ScenarioKind::all() {
            #[derive(Deserialize)]
            struct W {
                s: ScenarioKind,
            }
            let w: W = toml::from_str(&format!("s = \"{kind}\"")).unwrap();
            assert_eq!(w.s, kind);
        }
    }

    #[test]
    fn frequency_field_parses_units() {
        let c: ClockConfig = toml::from_str(r#"frequency = "50MHz""#).unwrap();
        assert_eq!(c.frequency.period_fs(), 20_000_000);
        assert!(toml::from_str::<ClockConfig>(r#"frequency = "quick""#).is_err());
    }
}
