use std::time::Duration;

use crate::config::ConfigError;
use crate::generator::GenConfig;

pub const MAX_SEQUENCES: usize = 1000;
pub const MAX_DIGITS_PER_SEQUENCE: usize = 100;
pub const MAX_SECS_PER_FLASH: f64 = 3600.0;

/// Validated parameters for one round. Fixed from start until reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    sequence_count: usize,
    digits_per_sequence: usize,
    secs_per_flash: f64,
    per_flash: Duration,
}

impl SessionConfig {
    pub fn new(
        sequence_count: usize,
        digits_per_sequence: usize,
        secs_per_flash: f64,
    ) -> Result<Self, ConfigError> {
        if sequence_count == 0 {
            return Err(ConfigError::ZeroSequences);
        }
        if sequence_count > MAX_SEQUENCES {
            return Err(ConfigError::TooManySequences {
                max: MAX_SEQUENCES,
                got: sequence_count,
            });
        }
        if digits_per_sequence == 0 {
            return Err(ConfigError::ZeroDigits);
        }
        if digits_per_sequence > MAX_DIGITS_PER_SEQUENCE {
            return Err(ConfigError::TooManyDigits {
                max: MAX_DIGITS_PER_SEQUENCE,
                got: digits_per_sequence,
            });
        }
        if !(0.0..=MAX_SECS_PER_FLASH).contains(&secs_per_flash) {
            return Err(ConfigError::InvalidDuration(secs_per_flash));
        }
        let per_flash = Duration::try_from_secs_f64(secs_per_flash)
            .map_err(|_| ConfigError::InvalidDuration(secs_per_flash))?;

        Ok(Self {
            sequence_count,
            digits_per_sequence,
            secs_per_flash,
            per_flash,
        })
    }

    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    pub fn digits_per_sequence(&self) -> usize {
        self.digits_per_sequence
    }

    pub fn secs_per_flash(&self) -> f64 {
        self.secs_per_flash
    }

    pub fn per_flash(&self) -> Duration {
        self.per_flash
    }

    pub fn gen_config(&self) -> GenConfig {
        GenConfig {
            sequence_count: self.sequence_count,
            digits_per_sequence: self.digits_per_sequence,
        }
    }
}
