//! Clock frequency values with unit parsing and period conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Femtoseconds in one second.
const FS_PER_S: f64 = 1e15;

/// A clock frequency stored in Hertz.
///
/// Parses strings like "100MHz", "50khz", "1GHz" or a bare number of Hz.
/// Only strictly positive, finite frequencies are accepted.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the clock period in whole femtoseconds (rounded).
    pub fn period_fs(&self) -> u64 {
        (FS_PER_S / self.0).round() as u64
    }
}

impl Default for Frequency {
    /// 100 MHz, a 10 ns period.
    fn default() -> Self {
        Self(100_000_000.0)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1e9)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1e6)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1e3)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        let hz = val * scale;
        if !hz.is_finite() || hz <= 0.0 {
            return Err(err());
        }
        Ok(Frequency(hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mhz() {
        let f: Frequency = "100MHz".parse().unwrap();
        assert_eq!(f.hz(), 100_000_000.0);
        assert_eq!(f.mhz(), 100.0);
    }

    #[test]
    fn parse_khz_case_insensitive() {
        let f: Frequency = "50khz".parse().unwrap();
        assert_eq!(f.hz(), 50_000.0);
    }

    #[test]
    fn parse_bare_number() {
        let f: Frequency = "25000000".parse().unwrap();
        assert_eq!(f.hz(), 25_000_000.0);
    }

    #[test]
    fn parse_rejects_garbage_and_non_positive() {
        assert!("fast".parse::<Frequency>().is_err());
        assert!("0MHz".parse::<Frequency>().is_err());
        assert!("-5Hz".parse::<Frequency>().is_err());
        let e = "x".parse::<Frequency>().unwrap_err();
        assert_eq!(e.to_string(), "invalid frequency: 'x'");
    }

    #[test]
    fn period_of_100mhz_is_10ns() {
        assert_eq!(Frequency::default().period_fs(), 10_000_000);
        let f: Frequency = "1GHz".parse().unwrap();
        assert_eq!(f.period_fs(), 1_000_000);
    }

    #[test]
    fn display_selects_best_unit() {
        assert_eq!(Frequency::new(1_000_000_000.0).to_string(), "1GHz");
        assert_eq!(Frequency::new(50_000_000.0).to_string(), "50MHz");
        assert_eq!(Frequency::new(44_100.0).to_string(), "44.1KHz");
        assert_eq!(Frequency::new(500.0).to_string(), "500Hz");
    }
}
