//! Attempt/session state machine for one (player, puzzle) pair.
//!
//! `Active(attempts_used)` → `Finished(success)`. A session leaves
//! `Finished` only by loading a different puzzle, which resets it to
//! `Active(0)`.
//!
//! Submissions are two-phase so the profile lookup can run without holding
//! the session: [`GameSession::begin_guess`] validates and takes the
//! in-flight slot, [`GameSession::complete_guess`] records the result. A
//! ticket that no longer owns the slot (puzzle changed, player gave up) is
//! discarded.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ValidationError;
use crate::evaluate::{Evaluation, Evaluator};
use crate::normalize::normalize_name;
use crate::reveal::compute_zoom;
use crate::suggest::SuggestionIndex;
use crate::types::{GuessAttempt, PuzzleRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active { attempts_used: u32 },
    Finished { success: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub puzzle_id: String,
    pub max_attempts: u32,
    pub attempts_used: u32,
    pub finished: bool,
    pub success: bool,
    #[serde(default)]
    pub gave_up: bool,
    #[serde(default)]
    pub attempts: Vec<GuessAttempt>,
}

impl SessionState {
    pub fn new(puzzle_id: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            max_attempts,
            attempts_used: 0,
            finished: false,
            success: false,
            gave_up: false,
            attempts: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.finished {
            SessionPhase::Finished {
                success: self.success,
            }
        } else {
            SessionPhase::Active {
                attempts_used: self.attempts_used,
            }
        }
    }

    pub fn attempts_left(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used)
    }

    pub fn already_guessed(&self, guess: &str) -> bool {
        let key = normalize_name(guess);
        self.attempts.iter().any(|a| normalize_name(&a.guess) == key)
    }
}

/// Proof that a submission owns the session's in-flight slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessTicket {
    id: u64,
    puzzle_id: String,
    guess: String,
    attempts_used: u32,
}

impl GuessTicket {
    pub fn guess(&self) -> &str {
        &self.guess
    }

    /// Attempts used before this guess.
    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    Recorded {
        attempt: GuessAttempt,
        phase: SessionPhase,
    },
    /// The session moved on (new puzzle or give-up) while the guess was
    /// being evaluated.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    state: SessionState,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl GameSession {
    pub fn new(puzzle_id: impl Into<String>, max_attempts: u32) -> Self {
        Self::from_state(SessionState::new(puzzle_id, max_attempts))
    }

    /// Resume a persisted session.
    pub fn from_state(state: SessionState) -> Self {
        Self {
            state,
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switch to another puzzle. Same puzzle is a no-op; a different one
    /// clears history and cancels any outstanding submission.
    pub fn load_puzzle(&mut self, puzzle_id: &str, max_attempts: u32) -> bool {
        if self.state.puzzle_id == puzzle_id {
            return false;
        }
        tracing::debug!(from = %self.state.puzzle_id, to = puzzle_id, "session reset for new puzzle");
        self.state = SessionState::new(puzzle_id, max_attempts);
        self.in_flight = None;
        true
    }

    /// Validate a guess and reserve the in-flight slot.
    ///
    /// `allowed` narrows input to known artist names; pass `None` to accept
    /// any text.
    pub fn begin_guess(
        &mut self,
        text: &str,
        allowed: Option<&SuggestionIndex>,
    ) -> Result<GuessTicket, ValidationError> {
        if self.state.finished {
            return Err(ValidationError::AlreadyFinished);
        }
        if self.in_flight.is_some() {
            return Err(ValidationError::SubmissionInFlight);
        }
        let guess = text.trim();
        if guess.is_empty() {
            return Err(ValidationError::EmptyGuess);
        }
        if let Some(index) = allowed {
            if !index.contains(guess) {
                return Err(ValidationError::NotInSuggestions(guess.to_string()));
            }
        }
        if self.state.already_guessed(guess) {
            return Err(ValidationError::DuplicateGuess(guess.to_string()));
        }
        if self.state.attempts_used >= self.state.max_attempts {
            return Err(ValidationError::AttemptsExhausted {
                used: self.state.attempts_used,
                max: self.state.max_attempts,
            });
        }

        self.next_ticket += 1;
        let id = self.next_ticket;
        self.in_flight = Some(id);
        Ok(GuessTicket {
            id,
            puzzle_id: self.state.puzzle_id.clone(),
            guess: guess.to_string(),
            attempts_used: self.state.attempts_used,
        })
    }

    /// Record the evaluation for `ticket`.
    pub fn complete_guess(&mut self, ticket: GuessTicket, evaluation: Evaluation) -> GuessOutcome {
        if self.in_flight != Some(ticket.id) || self.state.puzzle_id != ticket.puzzle_id {
            tracing::debug!(puzzle = %ticket.puzzle_id, "discarding stale guess result");
            return GuessOutcome::Discarded;
        }
        self.in_flight = None;

        let attempt = GuessAttempt {
            guess: ticket.guess,
            correct: evaluation.correct,
            feedback: if evaluation.correct {
                Vec::new()
            } else {
                evaluation.feedback
            },
        };
        self.state.attempts.push(attempt.clone());
        self.state.attempts_used += 1;
        if attempt.correct {
            self.state.finished = true;
            self.state.success = true;
        } else if self.state.attempts_used >= self.state.max_attempts {
            self.state.finished = true;
            self.state.success = false;
        }

        GuessOutcome::Recorded {
            attempt,
            phase: self.state.phase(),
        }
    }

    /// Release the in-flight slot without recording anything.
    pub fn abort_guess(&mut self, ticket: GuessTicket) {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
        }
    }

    /// End the puzzle without consuming an attempt.
    pub fn give_up(&mut self) -> Result<(), ValidationError> {
        if self.state.finished {
            return Err(ValidationError::AlreadyFinished);
        }
        self.state.finished = true;
        self.state.success = false;
        self.state.gave_up = true;
        self.in_flight = None;
        Ok(())
    }

    /// Validate, evaluate, and record in one call.
    pub async fn submit_guess(
        &mut self,
        text: &str,
        allowed: Option<&SuggestionIndex>,
        puzzle: &PuzzleRecord,
        evaluator: &Evaluator<'_>,
    ) -> Result<GuessOutcome, ValidationError> {
        let ticket = self.begin_guess(text, allowed)?;
        let evaluation = evaluator
            .evaluate(puzzle, ticket.guess(), ticket.attempts_used())
            .await;
        Ok(self.complete_guess(ticket, evaluation))
    }

    pub fn zoom(&self, reveal_boost: f64, config: &GameConfig) -> f64 {
        compute_zoom(
            self.state.attempts_used,
            self.state.max_attempts,
            self.state.finished,
            reveal_boost,
            config,
        )
    }
}
