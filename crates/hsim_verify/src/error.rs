//! Verification error types.

use hsim_sim::SimError;

/// Why a scenario did not pass.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// An expected-versus-observed check failed.
    #[error("scenario `{scenario}` failed at tick {tick}: {message}")]
    AssertionFailed {
        /// The scenario that failed.
        scenario: String,
        /// The last tick evaluated before the check.
        tick: u64,
        /// What was expected and what was observed.
        message: String,
    },

    /// The simulator itself reported an error.
    #[error(transparent)]
    Sim(#[from] SimError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_failed_display() {
        let e = VerifyError::AssertionFailed {
            scenario: "random".into(),
            tick: 12,
            message: "result #3: expected 5, got 4".into(),
        };
        assert_eq!(
            e.to_string(),
            "scenario `random` failed at tick 12: result #3: expected 5, got 4"
        );
    }

    #[test]
    fn sim_error_is_transparent() {
        let e: VerifyError = SimError::TickLimitExceeded { limit: 10 }.into();
        assert_eq!(e.to_string(), "tick limit exceeded: 10 ticks");
    }
}
