use std::time::{Duration, Instant};

use crate::generator::SequenceSet;

/// What the presenter is doing after a `start` or `poll`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStep {
    /// Sequence at this index is on screen
    Showing(usize),
    /// Every sequence has been shown
    Done,
}

/// Shows the sequences of a round one after another.
///
/// The presenter is a finite schedule: each sequence gets a deadline and
/// `poll` moves the cursor by at most one position when the deadline has
/// passed. It never owns a timer, the caller drives it from its tick loop.
#[derive(Debug, Clone)]
pub struct FlashPresenter {
    flash: SequenceSet,
    per_flash: Duration,
    cursor: usize,
    deadline: Option<Instant>,
    advances: usize,
    finished: bool,
}

impl FlashPresenter {
    pub fn new(flash: SequenceSet, per_flash: Duration) -> Self {
        Self {
            flash,
            per_flash,
            cursor: 0,
            deadline: None,
            advances: 0,
            finished: false,
        }
    }

    /// Put the first sequence on screen
    pub fn start(&mut self, now: Instant) -> FlashStep {
        self.cursor = 0;
        self.advances = 0;

        if self.flash.is_empty() {
            self.finished = true;
            self.deadline = None;
            return FlashStep::Done;
        }

        self.finished = false;
        self.deadline = now.checked_add(self.per_flash);
        FlashStep::Showing(0)
    }

    /// Advance to the next sequence if the current one has been up long enough
    pub fn poll(&mut self, now: Instant) -> FlashStep {
        if self.finished {
            return FlashStep::Done;
        }

        let Some(deadline) = self.deadline else {
            // not started yet, or the deadline is past what an Instant can hold
            return FlashStep::Showing(self.cursor);
        };

        if now < deadline {
            return FlashStep::Showing(self.cursor);
        }

        self.advances += 1;
        let next = self.cursor + 1;

        if next >= self.flash.len() {
            self.finished = true;
            self.deadline = None;
            tracing::debug!(advances = self.advances, "flash sequence exhausted");
            return FlashStep::Done;
        }

        self.cursor = next;
        self.deadline = now.checked_add(self.per_flash);
        tracing::debug!(index = next, "flashing next sequence");
        FlashStep::Showing(next)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn advances(&self) -> usize {
        self.advances
    }

    pub fn current(&self) -> Option<&str> {
        if self.finished {
            None
        } else {
            self.flash.get(self.cursor)
        }
    }

    /// "k/N" position label, 1-based
    pub fn index_text(&self) -> String {
        format!("{}/{}", self.cursor + 1, self.flash.len())
    }

    pub fn sequences(&self) -> &SequenceSet {
        &self.flash
    }

    pub fn into_sequences(self) -> SequenceSet {
        self.flash
    }

    pub fn per_flash(&self) -> Duration {
        self.per_flash
    }

    /// Time left on the current sequence
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
