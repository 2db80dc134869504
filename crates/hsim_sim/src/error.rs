//! Simulation error types for the tick kernel.
//!
//! The modeled hardware itself has no failure modes; every [`SimError`] is a
//! misuse of the kernel or a runaway simulation.

use hsim_common::InternalError;

/// Errors that can occur during simulation setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A signal or stage was declared with an unsupported bit width.
    #[error("invalid width {width} for `{name}`: {reason}")]
    InvalidWidth {
        /// Name of the signal or stage being declared.
        name: String,
        /// The rejected width.
        width: u32,
        /// Which range the width must fall in.
        reason: String,
    },

    /// Combinational settling did not converge, indicating a combinational loop.
    #[error("delta cycle limit exceeded at tick {tick} (max {max_deltas} deltas)")]
    DeltaCycleLimit {
        /// The tick during which settling failed.
        tick: u64,
        /// The maximum number of delta cycles allowed.
        max_deltas: u32,
    },

    /// The simulation ran past its configured tick limit.
    #[error("tick limit exceeded: {limit} ticks")]
    TickLimitExceeded {
        /// The configured limit.
        limit: u64,
    },

    /// A bug in the simulator itself.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_width_display() {
        let e = SimError::InvalidWidth {
            name: "a_data".into(),
            width: 0,
            reason: "must be in 1..=64".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid width 0 for `a_data`: must be in 1..=64"
        );
    }

    #[test]
    fn delta_cycle_limit_display() {
        let e = SimError::DeltaCycleLimit {
            tick: 12,
            max_deltas: 1000,
        };
        assert_eq!(
            e.to_string(),
            "delta cycle limit exceeded at tick 12 (max 1000 deltas)"
        );
    }

    #[test]
    fn tick_limit_display() {
        let e = SimError::TickLimitExceeded { limit: 500 };
        assert_eq!(e.to_string(), "tick limit exceeded: 500 ticks");
    }

    #[test]
    fn internal_is_transparent() {
        let e: SimError = InternalError::new("write to unknown signal 9").into();
        assert_eq!(
            e.to_string(),
            "internal simulator error: write to unknown signal 9"
        );
    }
}
