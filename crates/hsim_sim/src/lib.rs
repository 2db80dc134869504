//! Cycle-accurate simulator for ready/valid handshake pipelines.
//!
//! This crate models a synchronous design on a single discrete clock. Every
//! signal has exactly one writer, enforced by non-cloneable write tokens, and
//! all writes staged during a tick are committed atomically, so concurrent
//! processes never observe each other's in-flight updates.
//!
//! # Architecture
//!
//! The [`Kernel`] owns the signal table. Processes (the design under test and
//! any number of bus-functional drivers) implement [`Process`] and are resumed
//! once per tick against a frozen [`SignalView`]. Combinational logic runs in
//! [`Process::settle`] and is iterated to a fixed point after each commit.
//!
//! # Usage
//!
//! ```ignore
//! use hsim_sim::{Kernel, PipelineStage, Sink, Source, StageOptions};
//!
//! let mut kernel = Kernel::new();
//! let rst = kernel.add_signal("rst", 1)?;
//! let (mut adder, io) = PipelineStage::new(&mut kernel, 16, rst.id(), StageOptions::default())?;
//! let mut a = Source::send(&io.a, io.a_tx, vec![1, 2]);
//! let mut b = Source::send(&io.b, io.b_tx, vec![3, 4]);
//! let mut r = Sink::recv(&io.r, io.r_rx, 2);
//! kernel.spawn(&mut a);
//! kernel.spawn(&mut b);
//! kernel.spawn(&mut r);
//! kernel.run_until_idle(&mut adder, &mut [&mut a, &mut b, &mut r])?;
//! assert_eq!(r.values(), &[4, 6]);
//! ```
//!
//! # Modules
//!
//! - `error`: Simulation error types
//! - `time`: Tick indices and their wall-clock rendering
//! - `signal`: Signal handles, write tokens, and staged writes
//! - `kernel`: Tick scheduling, atomic commits, and delta-cycle settling
//! - `channel`: Ready/valid channels
//! - `stage`: The adder pipeline stage
//! - `driver`: Source and sink bus-functional models
//! - `monitor`: Passive per-tick channel recorder

#![warn(missing_docs)]

pub mod channel;
pub mod driver;
pub mod error;
pub mod kernel;
pub mod monitor;
pub mod signal;
pub mod stage;
pub mod time;

pub use channel::{Channel, ChannelConsumer, ChannelProducer, ChannelState};
pub use driver::{Sink, Source};
pub use error::SimError;
pub use kernel::{Activity, Kernel, Process, TickOutcome};
pub use monitor::Monitor;
pub use signal::{Drive, OutputSignal, SignalId, SignalState, SignalView};
pub use stage::{PipelineStage, ResetPolicy, StageIo, StageOptions, ValidRelease};
pub use time::{SimTime, Tick};
