use crate::config::{Config, ConfigError};
use crate::session::{SessionConfig, MAX_SECS_PER_FLASH, MAX_SEQUENCES};

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum SetupField {
    #[strum(to_string = "Number of sequences")]
    SequenceCount,
    #[strum(to_string = "Digits per sequence")]
    DigitsPerSequence,
    #[strum(to_string = "Seconds per flash")]
    SecsPerFlash,
}

impl SetupField {
    pub const ALL: [SetupField; 3] = [
        SetupField::SequenceCount,
        SetupField::DigitsPerSequence,
        SetupField::SecsPerFlash,
    ];

    /// Digits per sequence is shown but cannot be changed from the form
    pub fn is_locked(&self) -> bool {
        matches!(self, SetupField::DigitsPerSequence)
    }

    fn next(self) -> Self {
        match self {
            SetupField::SequenceCount => SetupField::DigitsPerSequence,
            SetupField::DigitsPerSequence => SetupField::SecsPerFlash,
            SetupField::SecsPerFlash => SetupField::SequenceCount,
        }
    }

    fn prev(self) -> Self {
        match self {
            SetupField::SequenceCount => SetupField::SecsPerFlash,
            SetupField::DigitsPerSequence => SetupField::SequenceCount,
            SetupField::SecsPerFlash => SetupField::DigitsPerSequence,
        }
    }
}

/// Editable text buffers behind the setup screen
#[derive(Debug, Clone, PartialEq)]
pub struct SetupForm {
    sequence_count: String,
    digits_per_sequence: usize,
    secs_per_flash: String,
    focus: SetupField,
}

impl SetupForm {
    pub fn new(config: &Config) -> Self {
        Self {
            sequence_count: config.sequence_count.to_string(),
            digits_per_sequence: config.digits_per_sequence,
            secs_per_flash: config.secs_per_flash.to_string(),
            focus: SetupField::SequenceCount,
        }
    }

    pub fn focus(&self) -> SetupField {
        self.focus
    }

    /// Move focus to the next editable field
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        if self.focus.is_locked() {
            self.focus = self.focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        if self.focus.is_locked() {
            self.focus = self.focus.prev();
        }
    }

    pub fn value(&self, field: SetupField) -> String {
        match field {
            SetupField::SequenceCount => self.sequence_count.clone(),
            SetupField::DigitsPerSequence => self.digits_per_sequence.to_string(),
            SetupField::SecsPerFlash => self.secs_per_flash.clone(),
        }
    }

    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            SetupField::SequenceCount => Some(&mut self.sequence_count),
            SetupField::DigitsPerSequence => None,
            SetupField::SecsPerFlash => Some(&mut self.secs_per_flash),
        }
    }

    /// Type into the focused field. Only digits, and a single '.' for the duration.
    pub fn type_char(&mut self, c: char) {
        let accepts_dot = self.focus == SetupField::SecsPerFlash;
        let Some(buf) = self.focused_buffer() else {
            return;
        };

        if c.is_ascii_digit() || (c == '.' && accepts_dot && !buf.contains('.')) {
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.focused_buffer() {
            buf.pop();
        }
    }

    /// Step the focused value up or down by one, clamped to the accepted range
    pub fn step(&mut self, delta: i64) {
        match self.focus {
            SetupField::SequenceCount => {
                let current = self.sequence_count.trim().parse::<usize>().unwrap_or(0);
                let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
                let next = if delta < 0 {
                    current.saturating_sub(magnitude)
                } else {
                    current.saturating_add(magnitude)
                };
                self.sequence_count = next.clamp(1, MAX_SEQUENCES).to_string();
            }
            SetupField::SecsPerFlash => {
                let current = self.secs_per_flash.trim().parse::<f64>().unwrap_or(0.0);
                // round to centiseconds so 0.1 + 1 shows as 1.1
                let next = ((current + delta as f64) * 100.0).round() / 100.0;
                self.secs_per_flash = if next.is_finite() {
                    next.clamp(0.0, MAX_SECS_PER_FLASH).to_string()
                } else {
                    "0".to_string()
                };
            }
            SetupField::DigitsPerSequence => {}
        }
    }

    /// Parse and validate the buffers into a round configuration
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let sequence_count =
            self.sequence_count
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::NotANumber {
                    field: "number of sequences",
                    raw: self.sequence_count.clone(),
                })?;

        let secs_per_flash =
            self.secs_per_flash
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::NotANumber {
                    field: "seconds per flash",
                    raw: self.secs_per_flash.clone(),
                })?;

        SessionConfig::new(sequence_count, self.digits_per_sequence, secs_per_flash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults_from_config() {
        let form = SetupForm::new(&Config::default());

        assert_eq!(form.value(SetupField::SequenceCount), "5");
        assert_eq!(form.value(SetupField::DigitsPerSequence), "2");
        assert_eq!(form.value(SetupField::SecsPerFlash), "2");
        assert_eq!(form.focus(), SetupField::SequenceCount);
    }

    #[test]
    fn test_focus_skips_locked_field() {
        let mut form = SetupForm::new(&Config::default());

        form.focus_next();
        assert_eq!(form.focus(), SetupField::SecsPerFlash);
        form.focus_next();
        assert_eq!(form.focus(), SetupField::SequenceCount);
        form.focus_prev();
        assert_eq!(form.focus(), SetupField::SecsPerFlash);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut form = SetupForm::new(&Config::default());

        form.backspace();
        form.type_char('1');
        form.type_char('2');
        form.type_char('x');
        form.type_char('.');
        assert_eq!(form.value(SetupField::SequenceCount), "12");

        form.focus_next();
        form.backspace();
        form.type_char('0');
        form.type_char('.');
        form.type_char('5');
        form.type_char('.');
        assert_eq!(form.value(SetupField::SecsPerFlash), "0.5");

        let sc = form.session_config().unwrap();
        assert_eq!(sc.sequence_count(), 12);
        assert_eq!(sc.secs_per_flash(), 0.5);
    }

    #[test]
    fn test_step_clamps() {
        let mut form = SetupForm::new(&Config {
            sequence_count: 1,
            digits_per_sequence: 2,
            secs_per_flash: 0.0,
        });

        form.step(-1);
        assert_eq!(form.value(SetupField::SequenceCount), "1");
        form.step(1);
        assert_eq!(form.value(SetupField::SequenceCount), "2");

        form.focus_next();
        form.step(-1);
        assert_eq!(form.value(SetupField::SecsPerFlash), "0");
        form.step(1);
        assert_eq!(form.value(SetupField::SecsPerFlash), "1");
    }

    #[test]
    fn test_empty_field_is_not_a_number() {
        let mut form = SetupForm::new(&Config::default());
        form.backspace();

        assert_matches!(
            form.session_config(),
            Err(ConfigError::NotANumber {
                field: "number of sequences",
                ..
            })
        );
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let mut form = SetupForm::new(&Config::default());
        form.backspace();
        form.type_char('0');

        assert_matches!(form.session_config(), Err(ConfigError::ZeroSequences));
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(SetupField::SecsPerFlash.to_string(), "Seconds per flash");
        assert!(SetupField::DigitsPerSequence.is_locked());
        assert!(!SetupField::SequenceCount.is_locked());
    }

    #[test]
    fn test_step_saturates_on_huge_count() {
        let mut form = SetupForm::new(&Config::default());
        form.sequence_count = usize::MAX.to_string();
        form.step(1);
        assert_eq!(form.value(SetupField::SequenceCount), MAX_SEQUENCES.to_string());

        form.sequence_count = i64::MAX.to_string();
        form.step(1);
        assert_eq!(form.value(SetupField::SequenceCount), MAX_SEQUENCES.to_string());

        form.sequence_count = "99999999999999999999999".to_string();
        form.step(-1);
        assert_eq!(form.value(SetupField::SequenceCount), "1");
    }

    #[test]
    fn test_step_keeps_fractional_secs_readable() {
        let mut form = SetupForm::new(&Config {
            secs_per_flash: 0.1,
            ..Config::default()
        });
        form.focus = SetupField::SecsPerFlash;

        form.step(1);
        assert_eq!(form.value(SetupField::SecsPerFlash), "1.1");
        form.step(-1);
        assert_eq!(form.value(SetupField::SecsPerFlash), "0.1");

        form.secs_per_flash = "3600".to_string();
        form.step(1);
        assert_eq!(form.value(SetupField::SecsPerFlash), "3600");
    }

    #[test]
    fn test_huge_secs_is_an_invalid_duration() {
        let mut form = SetupForm::new(&Config::default());
        form.secs_per_flash = "10000000000000000000".to_string();

        assert_matches!(form.session_config(), Err(ConfigError::InvalidDuration(_)));
    }
}
