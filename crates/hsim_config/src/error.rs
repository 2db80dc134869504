//! Configuration errors.

use std::path::PathBuf;

/// Why an `hsim.toml` could not be turned into a [`VerifyConfig`](crate::VerifyConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The TOML is malformed or names an unknown key or value.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid `{key}`: {reason}")]
    Invalid {
        /// Dotted key of the offending value, e.g. `dut.width`.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_names_the_key() {
        let err = ConfigError::invalid("dut.width", "must be in 1..=63, got 64");
        assert_eq!(err.to_string(), "invalid `dut.width`: must be in 1..=63, got 64");
    }

    #[test]
    fn io_names_the_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("bench/hsim.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot read bench/hsim.toml: no such file");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn parse_wraps_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("width = ").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(err.to_string().starts_with("malformed configuration:"));
    }
}
