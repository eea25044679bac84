//! Stream configuration shared by decoders and encoders.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{AudioError, AudioResult};

/// Channel count and sample rate of an interleaved sample stream.
///
/// Two configs are equal when both fields match; encoders and decoders use
/// this to check round-trip fidelity.
///
/// ```rust
/// use wavcodec::Config;
///
/// let config = Config::new(2, 44_100).unwrap();
/// assert_eq!(config, Config { channels: 2, sample_rate: 44_100 });
/// assert!(Config::new(0, 44_100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Number of interleaved channels, at least one.
    pub channels: usize,
    /// Samples per second per channel, at least one.
    pub sample_rate: usize,
}

impl Config {
    /// Creates a config, rejecting a zero channel count or sample rate.
    pub fn new(channels: usize, sample_rate: usize) -> AudioResult<Self> {
        let config = Self {
            channels,
            sample_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the `channels >= 1` and `sample_rate >= 1` invariants.
    pub fn validate(&self) -> AudioResult<()> {
        if self.channels == 0 {
            return Err(AudioError::invalid_config("channel count must be > 0"));
        }
        if self.sample_rate == 0 {
            return Err(AudioError::invalid_config("sample rate must be > 0"));
        }
        Ok(())
    }

    /// Number of interleaved samples in `seconds` of audio.
    pub const fn samples_for_seconds(&self, seconds: usize) -> usize {
        seconds * self.sample_rate * self.channels
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ch @ {} Hz", self.channels, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(Config::new(1, 8000).is_ok());
        assert!(matches!(
            Config::new(0, 8000),
            Err(AudioError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new(2, 0),
            Err(AudioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_samples_for_seconds() {
        let config = Config::new(2, 44_100).unwrap();
        assert_eq!(config.samples_for_seconds(1), 88_200);
        assert_eq!(config.to_string(), "2 ch @ 44100 Hz");
    }
}
