//! Ready/valid channels.
//!
//! A [`Channel`] is the read side of a `{data, valid, ready}` signal triple.
//! Its write tokens are split between a [`ChannelProducer`], which owns `data`
//! and `valid`, and a [`ChannelConsumer`], which owns `ready`.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::kernel::Kernel;
use crate::signal::{Drive, OutputSignal, SignalId, SignalView};

/// Read handles for one handshake channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    name: String,
    width: u32,
    /// The payload signal.
    pub data: SignalId,
    /// Asserted by the producer while `data` is meaningful.
    pub valid: SignalId,
    /// Asserted by the consumer when it can take a transfer.
    pub ready: SignalId,
}

impl Channel {
    /// Allocates `<name>_data`, `<name>_valid` and `<name>_ready` in `kernel`.
    pub fn new(
        kernel: &mut Kernel,
        name: impl Into<String>,
        width: u32,
    ) -> Result<(Channel, ChannelProducer, ChannelConsumer), SimError> {
        let name = name.into();
        let data = kernel.add_signal(format!("{name}_data"), width)?;
        let valid = kernel.add_signal(format!("{name}_valid"), 1)?;
        let ready = kernel.add_signal(format!("{name}_ready"), 1)?;
        let channel = Channel {
            name,
            width,
            data: data.id(),
            valid: valid.id(),
            ready: ready.id(),
        };
        Ok((
            channel,
            ChannelProducer { data, valid },
            ChannelConsumer { ready },
        ))
    }

    /// The channel name, without the per-signal suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the data signal.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns `true` if a transfer happens at this tick (`valid && ready`).
    pub fn accepted(&self, view: &SignalView<'_>) -> bool {
        view.bit(self.valid) && view.bit(self.ready)
    }

    /// Snapshots the three signals.
    pub fn state(&self, view: &SignalView<'_>) -> ChannelState {
        ChannelState {
            data: view.get(self.data),
            valid: view.bit(self.valid),
            ready: view.bit(self.ready),
        }
    }
}

/// The sampled values of a channel at one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Value on the data signal.
    pub data: u64,
    /// Value on the valid signal.
    pub valid: bool,
    /// Value on the ready signal.
    pub ready: bool,
}

impl ChannelState {
    /// Returns `true` if this snapshot is a transfer.
    pub fn accepted(&self) -> bool {
        self.valid && self.ready
    }
}

/// Write tokens for the producer side of a channel.
#[derive(Debug)]
pub struct ChannelProducer {
    data: OutputSignal,
    valid: OutputSignal,
}

impl ChannelProducer {
    /// The data write token.
    pub fn data(&self) -> &OutputSignal {
        &self.data
    }

    /// The valid write token.
    pub fn valid(&self) -> &OutputSignal {
        &self.valid
    }

    /// Stages `data` with valid asserted.
    pub fn offer(&self, next: &mut Drive, data: u64) {
        next.set(&self.data, data);
        next.set_bit(&self.valid, true);
    }

    /// Stages valid deasserted; data is left as is.
    pub fn withdraw(&self, next: &mut Drive) {
        next.set_bit(&self.valid, false);
    }
}

/// Write token for the consumer side of a channel.
#[derive(Debug)]
pub struct ChannelConsumer {
    ready: OutputSignal,
}

impl ChannelConsumer {
    /// The ready write token.
    pub fn ready(&self) -> &OutputSignal {
        &self.ready
    }

    /// Stages a new ready level.
    pub fn set_ready(&self, next: &mut Drive, ready: bool) {
        next.set_bit(&self.ready, ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Activity, Process};

    struct Idle;

    impl Process for Idle {
        fn on_tick(&mut self, _now: &SignalView<'_>, _next: &mut Drive) -> Activity {
            Activity::Done
        }
    }

    #[test]
    fn new_allocates_named_signals() {
        let mut kernel = Kernel::new();
        let (ch, _tx, _rx) = Channel::new(&mut kernel, "a", 16).unwrap();
        assert_eq!(ch.name(), "a");
        assert_eq!(ch.width(), 16);
        assert_eq!(kernel.find_signal("a_data"), Some(ch.data));
        assert_eq!(kernel.find_signal("a_valid"), Some(ch.valid));
        assert_eq!(kernel.find_signal("a_ready"), Some(ch.ready));
        assert_eq!(kernel.peek_bits(ch.data).width(), 16);
        assert_eq!(kernel.peek_bits(ch.ready).width(), 1);
    }

    #[test]
    fn new_rejects_zero_width() {
        let mut kernel = Kernel::new();
        assert!(matches!(
            Channel::new(&mut kernel, "a", 0),
            Err(SimError::InvalidWidth { .. })
        ));
    }

    #[test]
    fn accepted_requires_valid_and_ready() {
        let mut kernel = Kernel::new();
        let (ch, tx, rx) = Channel::new(&mut kernel, "a", 8).unwrap();

        kernel.poke(tx.valid(), 1);
        kernel.tick(&mut Idle, &mut []).unwrap();
        assert!(!ch.accepted(&kernel.view()));

        kernel.poke(rx.ready(), 1);
        kernel.tick(&mut Idle, &mut []).unwrap();
        assert!(ch.accepted(&kernel.view()));

        kernel.poke(tx.valid(), 0);
        kernel.tick(&mut Idle, &mut []).unwrap();
        assert!(!ch.accepted(&kernel.view()));
    }

    #[test]
    fn state_snapshot() {
        let mut kernel = Kernel::new();
        let (ch, tx, rx) = Channel::new(&mut kernel, "r", 17).unwrap();
        kernel.poke(tx.data(), 0x1_0000);
        kernel.poke(tx.valid(), 1);
        kernel.poke(rx.ready(), 1);
        kernel.tick(&mut Idle, &mut []).unwrap();

        let state = ch.state(&kernel.view());
        assert_eq!(
            state,
            ChannelState {
                data: 0x1_0000,
                valid: true,
                ready: true
            }
        );
        assert!(state.accepted());
    }

    #[test]
    fn producer_helpers_stage_writes() {
        let mut kernel = Kernel::new();
        let (_ch, tx, _rx) = Channel::new(&mut kernel, "b", 4).unwrap();
        let mut drive = Drive::new();
        tx.offer(&mut drive, 3);
        tx.withdraw(&mut drive);
        assert_eq!(drive.len(), 3);
    }

    #[test]
    fn consumer_helper_stages_ready() {
        let mut kernel = Kernel::new();
        let (ch, _tx, rx) = Channel::new(&mut kernel, "r", 4).unwrap();
        let mut drive = Drive::new();
        rx.set_ready(&mut drive, true);
        assert_eq!(drive.into_writes(), vec![(ch.ready, 1)]);
    }
}
