use thiserror::Error;

use crate::generator::SequenceSet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("answer has {actual} digits, expected at least {expected}")]
    InputTooShort { expected: usize, actual: usize },
}

/// One digit position: what was shown and what the player typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPair {
    pub expected: char,
    pub given: char,
}

impl DigitPair {
    pub fn is_match(&self) -> bool {
        self.expected == self.given
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceResult {
    pub digits: Vec<DigitPair>,
}

impl SequenceResult {
    pub fn is_correct(&self) -> bool {
        self.digits.iter().all(DigitPair::is_match)
    }

    pub fn expected(&self) -> String {
        self.digits.iter().map(|d| d.expected).collect()
    }

    pub fn given(&self) -> String {
        self.digits.iter().map(|d| d.given).collect()
    }
}

/// Outcome of comparing a response against a sequence set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub sequences: Vec<SequenceResult>,
    pub total: usize,
    pub correct: usize,
}

impl ScoreReport {
    /// Share of fully correct sequences in percent, `None` for an empty round
    pub fn percentage(&self) -> Option<f64> {
        match self.total {
            0 => None,
            total => Some(self.correct as f64 / total as f64 * 100.0),
        }
    }

    pub fn percentage_label(&self) -> String {
        match self.percentage() {
            Some(pct) => format!("{pct:.2}%"),
            None => "-".to_string(),
        }
    }

    pub fn flags(&self) -> Vec<bool> {
        self.sequences.iter().map(SequenceResult::is_correct).collect()
    }
}

/// Compare `input` positionally against the concatenation of `set`.
///
/// Characters past the last expected digit are ignored.
pub fn score(set: &SequenceSet, input: &str) -> Result<ScoreReport, ScoreError> {
    let given: Vec<char> = input.chars().collect();
    let expected_len = set.total_digits();

    if given.len() < expected_len {
        return Err(ScoreError::InputTooShort {
            expected: expected_len,
            actual: given.len(),
        });
    }

    let sequences: Vec<SequenceResult> = set
        .iter()
        .enumerate()
        .map(|(x, seq)| SequenceResult {
            digits: seq
                .chars()
                .enumerate()
                .filter_map(|(y, expected)| {
                    set.flattened_offset(x, y).map(|offset| DigitPair {
                        expected,
                        given: given[offset],
                    })
                })
                .collect(),
        })
        .collect();

    let correct = sequences.iter().filter(|s| s.is_correct()).count();

    Ok(ScoreReport {
        total: sequences.len(),
        correct,
        sequences,
    })
}
