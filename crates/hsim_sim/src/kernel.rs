//! Tick kernel: signal table, cooperative process scheduling, and atomic commits.
//!
//! [`Kernel`] owns every signal value. Processes never mutate signals
//! directly; each tick the kernel
//!
//! 1. commits writes staged between ticks (pokes and process prologues) and
//!    settles combinational logic,
//! 2. resumes the DUT and then every driver, in slice order, against one
//!    frozen [`SignalView`] while collecting their writes in a [`Drive`],
//! 3. commits that batch atomically and settles again,
//! 4. advances the tick counter.
//!
//! Because every resumption in step 2 reads the same frozen state, the order
//! of resumption never changes the values computed.

use hsim_common::{Arena, Bits, InternalError, MAX_WIDTH};
use tracing::{debug, trace};

use crate::error::SimError;
use crate::signal::{Drive, OutputSignal, SignalId, SignalState, SignalView};
use crate::time::Tick;

/// Whether a process still waits on future ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    /// Parked on the next tick.
    Running,
    /// Nothing left to wait for; does not keep a run alive.
    Done,
}

/// A unit of work resumed by the kernel once per tick.
///
/// The only suspension point is the tick boundary: `start` runs the part of a
/// process before its first wait, and each `on_tick` call runs from one wait
/// to the next.
pub trait Process {
    /// Runs the prologue before the first tick.
    ///
    /// Writes staged here become visible at the next tick.
    fn start(&mut self, _next: &mut Drive) {}

    /// Resumes the process at a tick.
    ///
    /// `now` holds the values sampled at this clock edge. Writes staged in
    /// `next` are committed together with every other process's writes.
    fn on_tick(&mut self, now: &SignalView<'_>, next: &mut Drive) -> Activity;

    /// Evaluates combinational logic.
    ///
    /// Called after every commit until no signal changes.
    fn settle(&mut self, _now: &SignalView<'_>, _next: &mut Drive) {}
}

/// Result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// The tick that was just evaluated.
    pub tick: Tick,
    /// How many drivers reported [`Activity::Running`].
    pub active: usize,
}

/// The simulation kernel: signal table, pending writes, and tick counter.
pub struct Kernel {
    /// All signals, indexed by [`SignalId`].
    signals: Arena<SignalId, SignalState>,
    /// Writes staged between ticks.
    pending: Drive,
    /// Index of the next tick to evaluate.
    tick: Tick,
    /// Optional cap on the number of ticks.
    tick_limit: Option<u64>,
    /// Maximum settle iterations per commit (default 1000).
    max_deltas: u32,
    /// Total settle iterations executed.
    total_deltas: u64,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    /// Creates an empty kernel at tick 0.
    pub fn new() -> Self {
        Self {
            signals: Arena::new(),
            pending: Drive::new(),
            tick: Tick::ZERO,
            tick_limit: None,
            max_deltas: 1_000,
            total_deltas: 0,
        }
    }

    /// Declares a zero-initialized signal and returns its only write token.
    pub fn add_signal(
        &mut self,
        name: impl Into<String>,
        width: u32,
    ) -> Result<OutputSignal, SimError> {
        let name = name.into();
        if width == 0 || width > MAX_WIDTH {
            return Err(SimError::InvalidWidth {
                name,
                width,
                reason: format!("signal width must be in 1..={MAX_WIDTH}"),
            });
        }
        let id = self.signals.alloc(SignalState::new(name, width));
        Ok(OutputSignal::new(id))
    }

    /// Sets the tick limit; ticking past it fails with [`SimError::TickLimitExceeded`].
    pub fn set_tick_limit(&mut self, limit: u64) {
        self.tick_limit = Some(limit);
    }

    /// Sets the maximum number of settle iterations per commit (at least 1).
    pub fn set_max_deltas(&mut self, max: u32) {
        self.max_deltas = max.max(1);
    }

    /// Returns the index of the next tick to be evaluated.
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Returns the total number of settle iterations executed.
    pub fn total_deltas(&self) -> u64 {
        self.total_deltas
    }

    /// Returns the number of declared signals.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Finds a signal by name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.signals.find(|s| s.name == name)
    }

    /// Returns a read-only view of the committed values.
    pub fn view(&self) -> SignalView<'_> {
        SignalView::new(&self.signals, self.tick)
    }

    /// Returns the committed value of a signal.
    pub fn peek(&self, id: SignalId) -> u64 {
        self.signals.get(id).value.to_u64()
    }

    /// Returns the committed value of a signal with its width.
    pub fn peek_bits(&self, id: SignalId) -> Bits {
        self.signals.get(id).value
    }

    /// Stages a write from outside any process, visible at the next tick.
    pub fn poke(&mut self, port: &OutputSignal, value: u64) {
        self.pending.set(port, value);
    }

    /// Runs a process's prologue, staging its writes for the next tick.
    pub fn spawn(&mut self, process: &mut dyn Process) {
        let before = self.pending.len();
        process.start(&mut self.pending);
        debug!(
            tick = self.tick.index(),
            writes = self.pending.len() - before,
            "spawned process"
        );
    }

    /// Evaluates one clock edge.
    pub fn tick(
        &mut self,
        dut: &mut dyn Process,
        drivers: &mut [&mut dyn Process],
    ) -> Result<TickOutcome, SimError> {
        if let Some(limit) = self.tick_limit {
            if self.tick.index() >= limit {
                return Err(SimError::TickLimitExceeded { limit });
            }
        }

        let pending = std::mem::take(&mut self.pending);
        self.commit(pending)?;
        self.settle(dut, drivers)?;

        let mut next = Drive::new();
        let mut active = 0;
        {
            let now = SignalView::new(&self.signals, self.tick);
            dut.on_tick(&now, &mut next);
            for process in drivers.iter_mut() {
                if process.on_tick(&now, &mut next) == Activity::Running {
                    active += 1;
                }
            }
        }
        let changed = self.commit(next)?;
        self.settle(dut, drivers)?;

        let tick = self.tick;
        debug!(tick = tick.index(), changed, active, "tick committed");
        self.tick = tick.next();
        Ok(TickOutcome { tick, active })
    }

    /// Ticks until every driver reports [`Activity::Done`].
    ///
    /// Always evaluates at least one tick.
    pub fn run_until_idle(
        &mut self,
        dut: &mut dyn Process,
        drivers: &mut [&mut dyn Process],
    ) -> Result<Tick, SimError> {
        loop {
            let outcome = self.tick(dut, drivers)?;
            if outcome.active == 0 {
                return Ok(outcome.tick);
            }
        }
    }

    /// Re-evaluates combinational logic until no signal changes.
    fn settle(
        &mut self,
        dut: &mut dyn Process,
        drivers: &mut [&mut dyn Process],
    ) -> Result<(), SimError> {
        for _ in 0..self.max_deltas {
            let mut next = Drive::new();
            {
                let now = SignalView::new(&self.signals, self.tick);
                dut.settle(&now, &mut next);
                for process in drivers.iter_mut() {
                    process.settle(&now, &mut next);
                }
            }
            self.total_deltas += 1;
            if self.commit(next)? == 0 {
                return Ok(());
            }
        }
        Err(SimError::DeltaCycleLimit {
            tick: self.tick.index(),
            max_deltas: self.max_deltas,
        })
    }

    /// Applies a batch of writes and returns how many signals changed value.
    fn commit(&mut self, drive: Drive) -> Result<usize, SimError> {
        let mut changed = 0;
        for (id, value) in drive.into_writes() {
            let Some(signal) = self.signals.try_get_mut(id) else {
                return Err(InternalError::new(format!(
                    "write to signal {} not declared in this kernel",
                    id.as_raw()
                ))
                .into());
            };
            let new_value = Bits::from_u64(value, signal.width);
            if new_value != signal.value {
                trace!(
                    tick = self.tick.index(),
                    signal = %signal.name,
                    from = %signal.value,
                    to = %new_value,
                    "signal changed"
                );
                signal.previous = signal.value;
                signal.value = new_value;
                changed += 1;
            }
        }
        Ok(changed)
    }
}
