//! Runs configured scenarios and reports their outcome as diagnostics.

use hsim_config::{ReleaseMode, ScenarioKind, VerifyConfig};
use hsim_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use hsim_sim::Tick;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::error::VerifyError;
use crate::scenarios::{self, ScenarioOutcome, ScenarioParams};

/// Diagnostic code for a failed check.
pub const ASSERTION_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Diagnostic code for a simulator error.
pub const SIMULATION_ERROR: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// Diagnostic code for a passed scenario.
pub const SCENARIO_PASSED: DiagnosticCode = DiagnosticCode::new(Category::Info, 1);

/// Diagnostic code for a stage configured to re-present consumed results.
pub const HELD_VALID: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// Result of running a single scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    /// Which scenario ran.
    pub kind: ScenarioKind,
    /// Whether every check held.
    pub passed: bool,
    /// Ticks evaluated before the scenario ended.
    pub ticks: u64,
    /// Result-channel transfers observed (0 on failure).
    pub transfers: usize,
    /// Why the scenario failed.
    pub error: Option<VerifyError>,
}

/// Runs one scenario.
pub fn run_scenario(
    kind: ScenarioKind,
    params: &ScenarioParams,
    seed: u64,
) -> Result<ScenarioOutcome, VerifyError> {
    let mut rng = StdRng::seed_from_u64(seed);
    match kind {
        ScenarioKind::Random => scenarios::random_sums(params, &mut rng),
        ScenarioKind::Reset => scenarios::reset_hold(params, &mut rng),
        ScenarioKind::NotReady => scenarios::backpressure_hold(params, &mut rng),
        ScenarioKind::NotValid => scenarios::invalid_input_hold(params, &mut rng),
        ScenarioKind::Backpressure => scenarios::intermittent_backpressure(params, &mut rng),
    }
}

/// Runs every configured scenario in order.
///
/// Each scenario gets its own generator seeded from the configured seed and
/// the scenario's position, so a scenario reproduces on its own. One
/// diagnostic per scenario is emitted to `sink`, preceded by a warning if
/// the stage is configured to keep `r_valid` high after a transfer.
pub fn run_all(config: &VerifyConfig, sink: &DiagnosticSink) -> Vec<ScenarioResult> {
    let params = ScenarioParams::from_config(config);
    let period_fs = config.clock.frequency.period_fs();

    if config.dut.valid_release == ReleaseMode::Never {
        warn!("valid_release = never; consumed results are presented again");
        sink.emit(
            Diagnostic::warning(
                HELD_VALID,
                "`r_valid` stays high after the result is consumed",
                Location::NONE,
            )
            .with_note("a stalled operand stream makes the sink read the last sum again")
            .with_help("set `dut.valid_release = \"on-consume\"` in hsim.toml"),
        );
    }

    config
        .run
        .scenarios
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            let seed = config.run.seed.wrapping_add(i as u64);
            let result = match run_scenario(kind, &params, seed) {
                Ok(outcome) => ScenarioResult {
                    kind,
                    passed: true,
                    ticks: outcome.ticks,
                    transfers: outcome.transfers,
                    error: None,
                },
                Err(error) => ScenarioResult {
                    kind,
                    passed: false,
                    ticks: failure_tick(&error),
                    transfers: 0,
                    error: Some(error),
                },
            };
            sink.emit(diagnostic(&result, period_fs));
            result
        })
        .collect()
}

fn failure_tick(error: &VerifyError) -> u64 {
    match error {
        VerifyError::AssertionFailed { tick, .. } => *tick,
        VerifyError::Sim(hsim_sim::SimError::DeltaCycleLimit { tick, .. }) => *tick,
        VerifyError::Sim(hsim_sim::SimError::TickLimitExceeded { limit }) => *limit,
        VerifyError::Sim(_) => 0,
    }
}

fn diagnostic(result: &ScenarioResult, period_fs: u64) -> Diagnostic {
    let name = result.kind.name();
    let at = Tick(result.ticks).at(period_fs);
    match &result.error {
        None => {
            info!(scenario = name, ticks = result.ticks, "scenario passed");
            Diagnostic::note(
                SCENARIO_PASSED,
                format!("scenario `{name}` passed"),
                Location::scenario(name, None),
            )
            .with_note(format!(
                "{} ticks ({at}), {} result transfers",
                result.ticks, result.transfers
            ))
        }
        Some(error @ VerifyError::AssertionFailed { message, tick, .. }) => {
            warn!(scenario = name, %error, "scenario failed");
            Diagnostic::error(
                ASSERTION_FAILED,
                message.clone(),
                Location::scenario(name, Some(*tick)),
            )
            .with_note(format!("simulation time {at}"))
        }
        Some(error @ VerifyError::Sim(sim)) => {
            warn!(scenario = name, %error, "scenario aborted");
            let diag = Diagnostic::error(
                SIMULATION_ERROR,
                format!("simulator error: {sim}"),
                Location::scenario(name, Some(result.ticks)),
            );
            match sim {
                hsim_sim::SimError::TickLimitExceeded { .. } => {
                    diag.with_help("raise `run.tick_limit` in hsim.toml")
                }
                _ => diag,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsim_config::load_config_from_str;
    use hsim_diagnostics::Severity;

    fn quick() -> VerifyConfig {
        load_config_from_str("[dut]\nwidth = 8\n[run]\ntransactions = 12\nhold_ticks = 4\n")
            .unwrap()
    }

    #[test]
    fn all_scenarios_pass_with_defaults() {
        let sink = DiagnosticSink::new();
        let results = run_all(&quick(), &sink);
        assert_eq!(results.len(), 5);
        for r in &results {
            assert!(r.passed, "{} failed: {:?}", r.kind, r.error);
        }
        assert!(!sink.has_errors());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 5);
        assert!(diags.iter().all(|d| d.code == SCENARIO_PASSED));
        assert_eq!(diags[0].location.scenario.as_deref(), Some("random"));
    }

    #[test]
    fn scenario_filter_is_respected() {
        let mut config = quick();
        config.run.scenarios = vec![ScenarioKind::NotReady];
        let sink = DiagnosticSink::new();
        let results = run_all(&config, &sink);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, ScenarioKind::NotReady);
        assert_eq!(results[0].transfers, 0);
    }

    #[test]
    fn tick_limit_reports_simulation_error() {
        let mut config = quick();
        config.run.tick_limit = 5;
        config.run.scenarios = vec![ScenarioKind::Random];
        let sink = DiagnosticSink::new();
        let results = run_all(&config, &sink);
        assert!(!results[0].passed);
        assert_eq!(results[0].ticks, 5);
        let diags = sink.take_all();
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].code, SIMULATION_ERROR);
        assert_eq!(diags[0].help.len(), 1);
    }

    #[test]
    fn never_release_is_warned_about() {
        let mut config = quick();
        config.dut.valid_release = ReleaseMode::Never;
        config.run.scenarios = vec![ScenarioKind::Random];
        let sink = DiagnosticSink::new();
        let results = run_all(&config, &sink);
        assert!(results[0].passed);
        assert_eq!(sink.count(Severity::Warning), 1);
        let diags = sink.take_all();
        assert_eq!(diags[0].code, HELD_VALID);
        assert_eq!(diags[1].code, SCENARIO_PASSED);
    }

    #[test]
    fn same_seed_reproduces() {
        let params = ScenarioParams {
            width: 8,
            transactions: 10,
            ..ScenarioParams::default()
        };
        let first = run_scenario(ScenarioKind::Backpressure, &params, 99).unwrap();
        let second = run_scenario(ScenarioKind::Backpressure, &params, 99).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn codes_render() {
        assert_eq!(ASSERTION_FAILED.to_string(), "E301");
        assert_eq!(SIMULATION_ERROR.to_string(), "E302");
        assert_eq!(SCENARIO_PASSED.to_string(), "I001");
        assert_eq!(HELD_VALID.to_string(), "W101");
    }
}
