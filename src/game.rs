use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::flash::{FlashPresenter, FlashStep};
use crate::generator::{SequenceGenerator, SequenceSet};
use crate::scorer::{score, ScoreError, ScoreReport};
use crate::session::SessionConfig;
use crate::setup::SetupForm;

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    Setup,
    ShowNumbers,
    UserInput,
    Score,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("cannot {action} while in {state}")]
    InvalidAction {
        action: &'static str,
        state: GameState,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Session data of the current round, owned by the phase it belongs to
#[derive(Debug)]
pub enum Phase {
    Setup,
    ShowNumbers {
        session: SessionConfig,
        presenter: FlashPresenter,
    },
    UserInput {
        session: SessionConfig,
        sequences: SequenceSet,
        input: String,
        started_at: Instant,
    },
    Score {
        session: SessionConfig,
        sequences: SequenceSet,
        input: String,
        report: ScoreReport,
        elapsed: Duration,
    },
}

impl Phase {
    pub fn state(&self) -> GameState {
        match self {
            Phase::Setup => GameState::Setup,
            Phase::ShowNumbers { .. } => GameState::ShowNumbers,
            Phase::UserInput { .. } => GameState::UserInput,
            Phase::Score { .. } => GameState::Score,
        }
    }
}

/// The memory game: setup, flash, recall, score, and back to setup
pub struct Game {
    pub form: SetupForm,
    phase: Phase,
    rng: Box<dyn RngCore + Send>,
    last_error: Option<String>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("form", &self.form)
            .field("phase", &self.phase)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl Game {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, Box::new(StdRng::from_entropy()))
    }

    /// Deterministic sequence generation, for reproducible rounds
    pub fn with_seed(config: &Config, seed: u64) -> Self {
        Self::with_rng(config, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn with_rng(config: &Config, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            form: SetupForm::new(config),
            phase: Phase::Setup,
            rng,
            last_error: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.phase.state()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Message of the last rejected action, cleared by the next successful one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn expect_state(&self, action: &'static str, expected: GameState) -> Result<(), GameError> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(GameError::InvalidAction { action, state })
        }
    }

    fn record<T>(&mut self, result: Result<T, GameError>) -> Result<T, GameError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                tracing::warn!(state = %self.state(), "{e}");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Setup -> ShowNumbers with a freshly generated sequence set
    pub fn start(&mut self, now: Instant) -> Result<(), GameError> {
        let result = self.try_start(now);
        self.record(result)
    }

    fn try_start(&mut self, now: Instant) -> Result<(), GameError> {
        self.expect_state("start", GameState::Setup)?;
        let session = self.form.session_config()?;

        let sequences =
            SequenceGenerator::new(session.gen_config()).generate_with(self.rng.as_mut());
        let mut presenter = FlashPresenter::new(sequences, session.per_flash());

        tracing::info!(
            sequences = session.sequence_count(),
            digits = session.digits_per_sequence(),
            secs_per_flash = session.secs_per_flash(),
            "round started"
        );

        let step = presenter.start(now);
        self.phase = Phase::ShowNumbers { session, presenter };

        if step == FlashStep::Done {
            self.finish_flash(now);
        }
        Ok(())
    }

    /// Drive the flash presenter; moves to UserInput once every sequence was shown
    pub fn tick(&mut self, now: Instant) {
        let done = match &mut self.phase {
            Phase::ShowNumbers { presenter, .. } => presenter.poll(now) == FlashStep::Done,
            _ => false,
        };

        if done {
            self.finish_flash(now);
        }
    }

    fn finish_flash(&mut self, now: Instant) {
        let phase = std::mem::replace(&mut self.phase, Phase::Setup);
        self.phase = match phase {
            Phase::ShowNumbers { session, presenter } => {
                tracing::info!("flash finished, waiting for answer");
                Phase::UserInput {
                    session,
                    sequences: presenter.into_sequences(),
                    input: String::new(),
                    started_at: now,
                }
            }
            other => other,
        };
    }

    /// Append a character to the answer while in UserInput
    pub fn type_char(&mut self, c: char) {
        if let Phase::UserInput { input, .. } = &mut self.phase {
            if !c.is_control() {
                input.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Phase::UserInput { input, .. } = &mut self.phase {
            input.pop();
        }
    }

    pub fn input(&self) -> Option<&str> {
        match &self.phase {
            Phase::UserInput { input, .. } | Phase::Score { input, .. } => Some(input),
            _ => None,
        }
    }

    /// UserInput -> Score. A short answer is rejected and the game stays in UserInput.
    pub fn submit(&mut self, now: Instant) -> Result<(), GameError> {
        let result = self.try_submit(now);
        self.record(result)
    }

    fn try_submit(&mut self, now: Instant) -> Result<(), GameError> {
        match std::mem::replace(&mut self.phase, Phase::Setup) {
            Phase::UserInput {
                session,
                sequences,
                input,
                started_at,
            } => match score(&sequences, &input) {
                Ok(report) => {
                    let elapsed = now.saturating_duration_since(started_at);
                    tracing::info!(
                        correct = report.correct,
                        total = report.total,
                        elapsed_secs = elapsed.as_secs_f64(),
                        "answer scored"
                    );
                    self.phase = Phase::Score {
                        session,
                        sequences,
                        input,
                        report,
                        elapsed,
                    };
                    Ok(())
                }
                Err(e) => {
                    self.phase = Phase::UserInput {
                        session,
                        sequences,
                        input,
                        started_at,
                    };
                    Err(e.into())
                }
            },
            other => {
                let state = other.state();
                self.phase = other;
                Err(GameError::InvalidAction {
                    action: "submit",
                    state,
                })
            }
        }
    }

    /// Score -> Setup. The form keeps its values, the round is dropped.
    pub fn reset(&mut self) -> Result<(), GameError> {
        let result = self.expect_state("reset", GameState::Score);
        if result.is_ok() {
            self.phase = Phase::Setup;
            tracing::info!("back to setup");
        }
        self.record(result)
    }

    pub fn presenter(&self) -> Option<&FlashPresenter> {
        match &self.phase {
            Phase::ShowNumbers { presenter, .. } => Some(presenter),
            _ => None,
        }
    }

    pub fn sequences(&self) -> Option<&SequenceSet> {
        match &self.phase {
            Phase::ShowNumbers { presenter, .. } => Some(presenter.sequences()),
            Phase::UserInput { sequences, .. } | Phase::Score { sequences, .. } => Some(sequences),
            Phase::Setup => None,
        }
    }

    pub fn report(&self) -> Option<(&ScoreReport, Duration)> {
        match &self.phase {
            Phase::Score {
                report, elapsed, ..
            } => Some((report, *elapsed)),
            _ => None,
        }
    }

    /// Configuration of the round in progress
    pub fn session(&self) -> Option<&SessionConfig> {
        match &self.phase {
            Phase::ShowNumbers { session, .. }
            | Phase::UserInput { session, .. }
            | Phase::Score { session, .. } => Some(session),
            Phase::Setup => None,
        }
    }
}
