//! Discrete clock ticks and their rendering as wall-clock time.
//!
//! A [`Tick`] counts rising clock edges since the kernel was created. The
//! kernel itself is untimed; a clock period is only needed to print a tick as
//! simulation time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;

/// The index of a clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    /// The first tick.
    pub const ZERO: Tick = Tick(0);

    /// Returns the raw edge count.
    pub fn index(self) -> u64 {
        self.0
    }

    /// Returns the following tick.
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// Returns the simulation time of this edge for a clock of `period_fs`.
    pub fn at(self, period_fs: u64) -> SimTime {
        SimTime(self.0.saturating_mul(period_fs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {}", self.0)
    }
}

/// A simulation time point in femtoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(pub u64);

impl SimTime {
    /// Returns the time in femtoseconds.
    pub fn fs(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.0;
        if fs == 0 {
            write!(f, "0 fs")
        } else if fs % FS_PER_MS == 0 {
            write!(f, "{} ms", fs / FS_PER_MS)
        } else if fs % FS_PER_US == 0 {
            write!(f, "{} us", fs / FS_PER_US)
        } else if fs % FS_PER_NS == 0 {
            write!(f, "{} ns", fs / FS_PER_NS)
        } else if fs % FS_PER_PS == 0 {
            write!(f, "{} ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs} fs")
        }
    }
}
