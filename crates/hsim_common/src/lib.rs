//! Shared foundational types for the handshake simulator.
//!
//! This crate provides width-bounded 2-state bit values, dense ID-indexed
//! storage, clock frequency parsing, and the common internal error type.

#![warn(missing_docs)]

pub mod arena;
pub mod bits;
pub mod frequency;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use bits::{mask, Bits, MAX_WIDTH};
pub use frequency::{Frequency, ParseFrequencyError};
pub use result::InternalError;
