//! Testbench wiring around a single adder stage.
//!
//! [`Testbench`] owns the kernel, the adder, and a monitor over the three
//! channels. The scenario side receives the write tokens in [`BenchPorts`]
//! and either drives them by hand with [`Testbench::poke`] or hands them to
//! [`Source`](hsim_sim::Source) and [`Sink`](hsim_sim::Sink) drivers.

use hsim_sim::{
    Activity, Channel, ChannelConsumer, ChannelProducer, ChannelState, Drive, Kernel, Monitor,
    OutputSignal, PipelineStage, Process, SignalId, SignalView, StageOptions, Tick, TickOutcome,
};
use tracing::debug;

use crate::error::VerifyError;

/// The adder's three channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    /// Operand A.
    A,
    /// Operand B.
    B,
    /// Result.
    R,
}

impl Port {
    /// Index of this port in the bench monitor.
    pub fn index(self) -> usize {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::R => 2,
        }
    }
}

/// Write tokens handed to the scenario.
#[derive(Debug)]
pub struct BenchPorts {
    /// Producer side of operand A.
    pub a: ChannelProducer,
    /// Producer side of operand B.
    pub b: ChannelProducer,
    /// Consumer side of the result.
    pub r: ChannelConsumer,
    /// The reset line.
    pub rst: OutputSignal,
}

/// The design under test plus its monitor, resumed as one process.
struct Fixture {
    monitor: Monitor,
    stage: PipelineStage,
}

impl Process for Fixture {
    fn on_tick(&mut self, now: &SignalView<'_>, next: &mut Drive) -> Activity {
        self.monitor.on_tick(now, next);
        self.stage.on_tick(now, next)
    }

    fn settle(&mut self, now: &SignalView<'_>, next: &mut Drive) {
        self.stage.settle(now, next);
    }
}

/// A kernel with one adder stage wired to three channels and a reset line.
pub struct Testbench {
    scenario: String,
    kernel: Kernel,
    fixture: Fixture,
    a: Channel,
    b: Channel,
    r: Channel,
    rst: SignalId,
}

impl Testbench {
    /// Builds a bench for `scenario` with operand width `width`.
    pub fn new(
        scenario: impl Into<String>,
        width: u32,
        options: StageOptions,
    ) -> Result<(Self, BenchPorts), VerifyError> {
        let scenario = scenario.into();
        let mut kernel = Kernel::new();
        let rst = kernel.add_signal("rst", 1)?;
        let (stage, io) = PipelineStage::new(&mut kernel, width, rst.id(), options)?;
        let monitor = Monitor::new(vec![io.a.clone(), io.b.clone(), io.r.clone()]);
        debug!(%scenario, width, ?options, "testbench built");

        let bench = Self {
            scenario,
            kernel,
            fixture: Fixture { monitor, stage },
            a: io.a,
            b: io.b,
            r: io.r,
            rst: rst.id(),
        };
        let ports = BenchPorts {
            a: io.a_tx,
            b: io.b_tx,
            r: io.r_rx,
            rst,
        };
        Ok((bench, ports))
    }

    /// The scenario this bench reports failures under.
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Caps the number of ticks this bench may evaluate.
    pub fn set_tick_limit(&mut self, limit: u64) {
        self.kernel.set_tick_limit(limit);
    }

    /// Number of ticks evaluated so far.
    pub fn tick_count(&self) -> u64 {
        self.kernel.current_tick().index()
    }

    /// The channel behind `port`.
    pub fn channel(&self, port: Port) -> &Channel {
        match port {
            Port::A => &self.a,
            Port::B => &self.b,
            Port::R => &self.r,
        }
    }

    /// The committed state of `port`.
    pub fn state(&self, port: Port) -> ChannelState {
        self.channel(port).state(&self.kernel.view())
    }

    /// The committed level of the reset line.
    pub fn in_reset(&self) -> bool {
        self.kernel.view().bit(self.rst)
    }

    /// The per-tick record of all three channels.
    pub fn monitor(&self) -> &Monitor {
        &self.fixture.monitor
    }

    /// The adder under test.
    pub fn stage(&self) -> &PipelineStage {
        &self.fixture.stage
    }

    /// Stages a write for the next tick.
    pub fn poke(&mut self, port: &OutputSignal, value: u64) {
        self.kernel.poke(port, value);
    }

    /// Runs a driver's prologue.
    pub fn spawn(&mut self, driver: &mut dyn Process) {
        self.kernel.spawn(driver);
    }

    /// Evaluates one tick and checks the ready fan-out.
    pub fn tick(&mut self, drivers: &mut [&mut dyn Process]) -> Result<TickOutcome, VerifyError> {
        let outcome = self.kernel.tick(&mut self.fixture, drivers)?;
        let (a, b, r) = (self.state(Port::A), self.state(Port::B), self.state(Port::R));
        self.check(
            a.ready == r.ready && b.ready == r.ready,
            format!(
                "ready fan-out broken: a_ready={} b_ready={} r_ready={}",
                a.ready as u8, b.ready as u8, r.ready as u8
            ),
        )?;
        Ok(outcome)
    }

    /// Evaluates `count` ticks, calling `check` after each one.
    pub fn hold<F>(
        &mut self,
        count: u64,
        drivers: &mut [&mut dyn Process],
        mut check: F,
    ) -> Result<(), VerifyError>
    where
        F: FnMut(&Testbench) -> Result<(), VerifyError>,
    {
        for _ in 0..count {
            self.tick(drivers)?;
            check(self)?;
        }
        Ok(())
    }

    /// Ticks until every driver is done; returns the last tick evaluated.
    pub fn run(&mut self, drivers: &mut [&mut dyn Process]) -> Result<Tick, VerifyError> {
        loop {
            let outcome = self.tick(drivers)?;
            if outcome.active == 0 {
                return Ok(outcome.tick);
            }
        }
    }

    /// Holds reset high for `cycles` ticks, then stages its release.
    pub fn reset(&mut self, rst: &OutputSignal, cycles: u64) -> Result<(), VerifyError> {
        self.kernel.poke(rst, 1);
        for _ in 0..cycles {
            self.tick(&mut [])?;
        }
        self.kernel.poke(rst, 0);
        debug!(scenario = %self.scenario, cycles, "reset released");
        Ok(())
    }

    /// Fails the scenario with `message` unless `cond` holds.
    pub fn check(&self, cond: bool, message: impl Into<String>) -> Result<(), VerifyError> {
        if cond {
            return Ok(());
        }
        Err(VerifyError::AssertionFailed {
            scenario: self.scenario.clone(),
            tick: self.tick_count().saturating_sub(1),
            message: message.into(),
        })
    }

    /// Fails unless the result channel reads `data` with `valid`.
    pub fn expect_result(&self, data: u64, valid: bool) -> Result<(), VerifyError> {
        let r = self.state(Port::R);
        self.check(
            r.data == data && r.valid == valid,
            format!(
                "expected r_data={data} r_valid={}, got r_data={} r_valid={}",
                valid as u8, r.data, r.valid as u8
            ),
        )
    }
}
