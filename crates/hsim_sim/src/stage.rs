//! The adder pipeline stage.
//!
//! [`PipelineStage`] consumes two operand channels `a` and `b` (width W) and
//! produces their sum on a result channel `r` (width W+1). It holds at most
//! one result: `a_ready` and `b_ready` follow `r_ready` combinationally, so
//! operands are only taken when the downstream can take the result.

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelConsumer, ChannelProducer};
use crate::error::SimError;
use crate::kernel::{Activity, Kernel, Process};
use crate::signal::{Drive, SignalId, SignalView};

/// What the synchronous reset clears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPolicy {
    /// Reset forces the result data to zero and the result valid flag low.
    #[default]
    ClearDataAndValid,
    /// Reset forces the result data to zero; valid keeps its latched value.
    ClearDataOnly,
}

/// When a latched result stops being presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidRelease {
    /// Valid falls at the tick after the result is accepted, unless a new
    /// operand pair is accepted at the same tick.
    #[default]
    OnConsume,
    /// Valid stays high once set; only reset (under
    /// [`ResetPolicy::ClearDataAndValid`]) lowers it.
    Never,
}

/// Behavioral options of a [`PipelineStage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOptions {
    /// Reset behavior.
    pub reset: ResetPolicy,
    /// Valid release behavior.
    pub release: ValidRelease,
}

/// The scenario side of a freshly built stage.
///
/// The stage keeps the consumer side of `a` and `b` and the producer side of
/// `r`; everything else is handed back to the caller.
#[derive(Debug)]
pub struct StageIo {
    /// Operand A.
    pub a: Channel,
    /// Producer tokens for operand A.
    pub a_tx: ChannelProducer,
    /// Operand B.
    pub b: Channel,
    /// Producer tokens for operand B.
    pub b_tx: ChannelProducer,
    /// The result channel.
    pub r: Channel,
    /// Consumer token for the result.
    pub r_rx: ChannelConsumer,
}

/// A registered adder with ready/valid ports.
#[derive(Debug)]
pub struct PipelineStage {
    width: u32,
    options: StageOptions,
    a: Channel,
    a_rx: ChannelConsumer,
    b: Channel,
    b_rx: ChannelConsumer,
    r: Channel,
    r_tx: ChannelProducer,
    rst: SignalId,
    result_data: u64,
    result_valid: bool,
}

impl PipelineStage {
    /// Builds a stage of operand width `width` reset by `rst`.
    ///
    /// Allocates channels `a`, `b` and `r` in `kernel`. `width` must be in
    /// `1..=63` so that the result fits a 64-bit signal.
    pub fn new(
        kernel: &mut Kernel,
        width: u32,
        rst: SignalId,
        options: StageOptions,
    ) -> Result<(Self, StageIo), SimError> {
        if width == 0 || width >= hsim_common::MAX_WIDTH {
            return Err(SimError::InvalidWidth {
                name: "adder".to_string(),
                width,
                reason: format!("operand width must be in 1..={}", hsim_common::MAX_WIDTH - 1),
            });
        }
        let (a, a_tx, a_rx) = Channel::new(kernel, "a", width)?;
        let (b, b_tx, b_rx) = Channel::new(kernel, "b", width)?;
        let (r, r_tx, r_rx) = Channel::new(kernel, "r", width + 1)?;

        let stage = Self {
            width,
            options,
            a: a.clone(),
            a_rx,
            b: b.clone(),
            b_rx,
            r: r.clone(),
            r_tx,
            rst,
            result_data: 0,
            result_valid: false,
        };
        let io = StageIo {
            a,
            a_tx,
            b,
            b_tx,
            r,
            r_rx,
        };
        Ok((stage, io))
    }

    /// Operand width W.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The options this stage was built with.
    pub fn options(&self) -> StageOptions {
        self.options
    }

    /// The latched result value.
    pub fn result_data(&self) -> u64 {
        self.result_data
    }

    /// The latched result valid flag.
    pub fn result_valid(&self) -> bool {
        self.result_valid
    }
}

impl Process for PipelineStage {
    fn on_tick(&mut self, now: &SignalView<'_>, next: &mut Drive) -> Activity {
        let take = self.a.accepted(now) && self.b.accepted(now);
        if take {
            self.result_valid = true;
            self.result_data = now.get(self.a.data) + now.get(self.b.data);
        } else if self.options.release == ValidRelease::OnConsume && self.r.accepted(now) {
            self.result_valid = false;
        }

        if now.bit(self.rst) {
            self.result_data = 0;
            if self.options.reset == ResetPolicy::ClearDataAndValid {
                self.result_valid = false;
            }
        }

        next.set(self.r_tx.data(), self.result_data);
        next.set_bit(self.r_tx.valid(), self.result_valid);
        Activity::Running
    }

    fn settle(&mut self, now: &SignalView<'_>, next: &mut Drive) {
        let ready = now.bit(self.r.ready);
        self.a_rx.set_ready(next, ready);
        self.b_rx.set_ready(next, ready);
    }
}
