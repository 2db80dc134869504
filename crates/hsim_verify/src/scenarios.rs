//! The canonical adder scenarios.
//!
//! Every scenario builds a fresh [`Testbench`], holds reset for
//! `reset_ticks`, then drives one protocol situation and compares what the
//! result channel shows against the golden model. The first failed check
//! aborts the scenario.

use hsim_common::mask;
use hsim_config::{ReleaseMode, ResetMode, VerifyConfig};
use hsim_sim::{ResetPolicy, Sink, Source, StageOptions, ValidRelease};
use rand::Rng;
use tracing::info;

use crate::error::VerifyError;
use crate::golden;
use crate::testbench::{BenchPorts, Port, Testbench};

/// Knobs shared by all scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenarioParams {
    /// Operand width W.
    pub width: u32,
    /// Adder behavior.
    pub options: StageOptions,
    /// Operand pairs streamed by the throughput scenarios.
    pub transactions: usize,
    /// Ticks each hold scenario keeps its condition asserted.
    pub hold_ticks: u64,
    /// Ticks reset is held before the scenario starts.
    pub reset_ticks: u64,
    /// Runaway guard on the total ticks of one scenario.
    pub tick_limit: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            width: 16,
            options: StageOptions::default(),
            transactions: 100,
            hold_ticks: 20,
            reset_ticks: 3,
            tick_limit: 100_000,
        }
    }
}

impl ScenarioParams {
    /// Takes the parameters from a loaded configuration.
    pub fn from_config(config: &VerifyConfig) -> Self {
        let reset = match config.dut.reset {
            ResetMode::ClearAll => ResetPolicy::ClearDataAndValid,
            ResetMode::ClearData => ResetPolicy::ClearDataOnly,
        };
        let release = match config.dut.valid_release {
            ReleaseMode::OnConsume => ValidRelease::OnConsume,
            ReleaseMode::Never => ValidRelease::Never,
        };
        Self {
            width: config.dut.width,
            options: StageOptions { reset, release },
            transactions: config.run.transactions,
            hold_ticks: config.run.hold_ticks,
            reset_ticks: config.run.reset_ticks,
            tick_limit: config.run.tick_limit,
        }
    }
}

/// What a passing scenario observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Ticks evaluated, reset included.
    pub ticks: u64,
    /// Transfers seen on the result channel.
    pub transfers: usize,
}

fn bench(name: &str, params: &ScenarioParams) -> Result<(Testbench, BenchPorts), VerifyError> {
    let (mut tb, ports) = Testbench::new(name, params.width, params.options)?;
    tb.set_tick_limit(params.tick_limit);
    tb.reset(&ports.rst, params.reset_ticks)?;
    Ok((tb, ports))
}

fn operands<R: Rng>(rng: &mut R, width: u32, count: usize) -> Vec<u64> {
    let max = mask(width);
    (0..count).map(|_| rng.gen_range(0..=max)).collect()
}

fn outcome(tb: &Testbench) -> ScenarioOutcome {
    ScenarioOutcome {
        ticks: tb.tick_count(),
        transfers: tb.monitor().transfers(Port::R.index()).len(),
    }
}

/// Compares a received stream against the golden one, naming the first mismatch.
fn compare(tb: &Testbench, expected: &[u64], got: &[u64]) -> Result<(), VerifyError> {
    tb.check(
        got.len() == expected.len(),
        format!("expected {} results, got {}", expected.len(), got.len()),
    )?;
    if let Some((i, (e, g))) = expected
        .iter()
        .zip(got)
        .enumerate()
        .find(|(_, (e, g))| e != g)
    {
        return tb.check(false, format!("result #{i}: expected {e}, got {g}"));
    }
    Ok(())
}

/// Streams random operand pairs back to back with the result always ready.
pub fn random_sums<R: Rng>(
    params: &ScenarioParams,
    rng: &mut R,
) -> Result<ScenarioOutcome, VerifyError> {
    let (mut tb, ports) = bench("random", params)?;
    let n = params.transactions;
    let data_a = operands(rng, params.width, n);
    let data_b = operands(rng, params.width, n);
    let expected = golden::expected(&data_a, &data_b, params.width);

    let (a_ch, b_ch, r_ch) = (
        tb.channel(Port::A).clone(),
        tb.channel(Port::B).clone(),
        tb.channel(Port::R).clone(),
    );
    let mut a = Source::send(&a_ch, ports.a, data_a);
    let mut b = Source::send(&b_ch, ports.b, data_b);
    let mut r = Sink::recv(&r_ch, ports.r, n);
    tb.spawn(&mut a);
    tb.spawn(&mut b);
    tb.spawn(&mut r);
    tb.run(&mut [&mut a, &mut b, &mut r])?;

    compare(&tb, &expected, r.values())?;
    info!(transactions = n, ticks = tb.tick_count(), "random sums matched");
    Ok(outcome(&tb))
}

/// Holds reset with valid operands offered and checks the result stays cleared.
///
/// A second phase latches a result first, then asserts reset with the result
/// stalled, so the configured [`ResetPolicy`] decides what valid reads.
pub fn reset_hold<R: Rng>(
    params: &ScenarioParams,
    rng: &mut R,
) -> Result<ScenarioOutcome, VerifyError> {
    let (mut tb, ports) = bench("reset", params)?;
    let width = params.width;

    tb.poke(ports.a.valid(), 1);
    tb.poke(ports.b.valid(), 1);
    tb.poke(&ports.rst, 1);
    for _ in 0..params.hold_ticks {
        let (x, y) = (rng.gen_range(0..=mask(width)), rng.gen_range(0..=mask(width)));
        tb.poke(ports.a.data(), x);
        tb.poke(ports.b.data(), y);
        tb.tick(&mut [])?;
        tb.expect_result(0, false)?;
    }

    // Latch one result, then stall it and reset.
    let (x, y) = (mask(width), 1);
    tb.poke(&ports.rst, 0);
    tb.poke(ports.a.data(), x);
    tb.poke(ports.b.data(), y);
    tb.poke(ports.r.ready(), 1);
    tb.tick(&mut [])?;
    tb.expect_result(golden::masked_sum(x, y, width), true)?;

    tb.poke(ports.a.valid(), 0);
    tb.poke(ports.b.valid(), 0);
    tb.poke(ports.r.ready(), 0);
    tb.poke(&ports.rst, 1);
    let valid_in_reset = params.options.reset == ResetPolicy::ClearDataOnly;
    tb.hold(params.hold_ticks, &mut [], |tb| {
        tb.expect_result(0, valid_in_reset)
    })?;
    tb.poke(&ports.rst, 0);

    info!(policy = ?params.options.reset, "reset held result cleared");
    Ok(outcome(&tb))
}

/// Offers operands with the result not ready and checks nothing is taken.
pub fn backpressure_hold<R: Rng>(
    params: &ScenarioParams,
    rng: &mut R,
) -> Result<ScenarioOutcome, VerifyError> {
    let (mut tb, ports) = bench("not-ready", params)?;
    let width = params.width;

    tb.poke(ports.a.valid(), 1);
    tb.poke(ports.b.valid(), 1);
    tb.poke(ports.r.ready(), 0);
    for _ in 0..params.hold_ticks {
        let (x, y) = (rng.gen_range(0..=mask(width)), rng.gen_range(0..=mask(width)));
        tb.poke(ports.a.data(), x);
        tb.poke(ports.b.data(), y);
        tb.tick(&mut [])?;
        tb.expect_result(0, false)?;
        let (a, b) = (tb.state(Port::A), tb.state(Port::B));
        tb.check(
            !a.accepted() && !b.accepted(),
            "operand accepted while the result was not ready",
        )?;
    }

    info!(ticks = params.hold_ticks, "backpressure held");
    Ok(outcome(&tb))
}

/// Holds one operand invalid at a time, then resumes a full stream.
pub fn invalid_input_hold<R: Rng>(
    params: &ScenarioParams,
    rng: &mut R,
) -> Result<ScenarioOutcome, VerifyError> {
    let (mut tb, ports) = bench("not-valid", params)?;
    let width = params.width;
    let k = params.hold_ticks as usize;
    let data_a = operands(rng, width, k);
    let data_b = operands(rng, width, k);

    tb.poke(ports.r.ready(), 1);
    for (valid_a, valid_b) in [(0, 1), (1, 0)] {
        tb.poke(ports.a.valid(), valid_a);
        tb.poke(ports.b.valid(), valid_b);
        for (&x, &y) in data_a.iter().zip(&data_b) {
            tb.poke(ports.a.data(), x);
            tb.poke(ports.b.data(), y);
            tb.tick(&mut [])?;
            tb.expect_result(0, false)?;
        }
    }

    let expected = golden::expected(&data_a, &data_b, width);
    let (a_ch, b_ch, r_ch) = (
        tb.channel(Port::A).clone(),
        tb.channel(Port::B).clone(),
        tb.channel(Port::R).clone(),
    );
    let mut a = Source::send(&a_ch, ports.a, data_a);
    let mut b = Source::send(&b_ch, ports.b, data_b);
    let mut r = Sink::recv(&r_ch, ports.r, k);
    tb.spawn(&mut a);
    tb.spawn(&mut b);
    tb.spawn(&mut r);
    tb.run(&mut [&mut a, &mut b, &mut r])?;
    compare(&tb, &expected, r.values())?;

    info!(hold = k, "invalid inputs suppressed, stream resumed");
    Ok(outcome(&tb))
}

/// Streams random operands into a sink that stalls at random.
///
/// Checks that each tick where both operands transfer produces exactly one
/// result transfer, later and in the same order.
pub fn intermittent_backpressure<R: Rng>(
    params: &ScenarioParams,
    rng: &mut R,
) -> Result<ScenarioOutcome, VerifyError> {
    let (mut tb, ports) = bench("backpressure", params)?;
    let n = params.transactions;
    let data_a = operands(rng, params.width, n);
    let data_b = operands(rng, params.width, n);
    let expected = golden::expected(&data_a, &data_b, params.width);

    let mut stalls: Vec<bool> = (0..n.max(1)).map(|_| rng.gen_bool(0.4)).collect();
    stalls[0] = false;

    let (a_ch, b_ch, r_ch) = (
        tb.channel(Port::A).clone(),
        tb.channel(Port::B).clone(),
        tb.channel(Port::R).clone(),
    );
    let mut a = Source::send(&a_ch, ports.a, data_a);
    let mut b = Source::send(&b_ch, ports.b, data_b);
    let mut r = Sink::recv(&r_ch, ports.r, n).with_stall_pattern(stalls);
    tb.spawn(&mut a);
    tb.spawn(&mut b);
    tb.spawn(&mut r);
    tb.run(&mut [&mut a, &mut b, &mut r])?;
    compare(&tb, &expected, r.values())?;

    let monitor = tb.monitor();
    let taken = monitor.coincident(&[Port::A.index(), Port::B.index()]);
    let results = monitor.transfers(Port::R.index());
    tb.check(
        taken.len() == results.len(),
        format!(
            "{} operand pairs accepted but {} results transferred",
            taken.len(),
            results.len()
        ),
    )?;
    for (i, (pair_tick, (result_tick, _))) in taken.iter().zip(&results).enumerate() {
        tb.check(
            result_tick > pair_tick,
            format!("result #{i} transferred at {result_tick}, before its operands at {pair_tick}"),
        )?;
    }
    let observed: Vec<u64> = results.iter().map(|&(_, v)| v).collect();
    compare(&tb, &expected, &observed)?;

    info!(
        transactions = n,
        ticks = tb.tick_count(),
        "no duplication or loss under backpressure"
    );
    Ok(outcome(&tb))
}
