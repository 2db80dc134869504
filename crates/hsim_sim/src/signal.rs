//! Signal identity, exclusive write tokens, and double-buffered writes.
//!
//! Every signal has a copyable [`SignalId`] that anyone may read through a
//! [`SignalView`], and exactly one [`OutputSignal`] token that authorizes
//! writes. The token is minted once by the kernel and cannot be cloned, so a
//! signal has a single writer for as long as the token lives.
//!
//! Writes never land directly: they are staged in a [`Drive`] buffer and the
//! kernel commits whole buffers between evaluation phases.

use hsim_common::{Arena, ArenaId, Bits};
use serde::{Deserialize, Serialize};

use crate::time::Tick;

/// Opaque read handle for a simulation signal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates a `SignalId` from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl ArenaId for SignalId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

/// The exclusive write token for one signal.
///
/// Deliberately neither `Clone` nor `Copy`.
#[derive(Debug, PartialEq, Eq)]
pub struct OutputSignal {
    id: SignalId,
}

impl OutputSignal {
    pub(crate) fn new(id: SignalId) -> Self {
        Self { id }
    }

    /// Returns the read handle of the signal this token writes.
    pub fn id(&self) -> SignalId {
        self.id
    }
}

/// The committed runtime state of a signal.
#[derive(Clone, Debug)]
pub struct SignalState {
    /// Name for logging and lookup.
    pub name: String,
    /// Declared bit width.
    pub width: u32,
    /// Current committed value.
    pub value: Bits,
    /// Value before the most recent change.
    pub previous: Bits,
}

impl SignalState {
    /// Creates a signal initialized to zero.
    pub fn new(name: String, width: u32) -> Self {
        let zero = Bits::zero(width);
        Self {
            name,
            width,
            value: zero,
            previous: zero,
        }
    }
}

/// A read-only view of the committed signal values at one instant.
#[derive(Clone, Copy)]
pub struct SignalView<'a> {
    signals: &'a Arena<SignalId, SignalState>,
    tick: Tick,
}

impl<'a> SignalView<'a> {
    pub(crate) fn new(signals: &'a Arena<SignalId, SignalState>, tick: Tick) -> Self {
        Self { signals, tick }
    }

    /// The tick being evaluated.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Returns the value of a signal.
    pub fn get(&self, id: SignalId) -> u64 {
        self.signals.get(id).value.to_u64()
    }

    /// Returns `true` if the signal is non-zero.
    pub fn bit(&self, id: SignalId) -> bool {
        !self.signals.get(id).value.is_zero()
    }

    /// Returns the value of a signal with its width.
    pub fn bits(&self, id: SignalId) -> Bits {
        self.signals.get(id).value
    }

    /// Returns the name of a signal.
    pub fn name(&self, id: SignalId) -> &'a str {
        &self.signals.get(id).name
    }
}

/// A batch of staged writes, applied atomically by the kernel.
///
/// A later write to the same signal in one batch replaces an earlier one.
#[derive(Debug, Default)]
pub struct Drive {
    writes: Vec<(SignalId, u64)>,
}

impl Drive {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `value` for the signal owned by `port`.
    pub fn set(&mut self, port: &OutputSignal, value: u64) {
        self.writes.push((port.id, value));
    }

    /// Stages a single-bit value for the signal owned by `port`.
    pub fn set_bit(&mut self, port: &OutputSignal, value: bool) {
        self.set(port, value as u64);
    }

    /// Returns the number of staged writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub(crate) fn into_writes(self) -> Vec<(SignalId, u64)> {
        self.writes
    }
}
