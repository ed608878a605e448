//! Guess evaluation: correctness plus feedback for one submitted guess.
//!
//! This is the single implementation shared by the HTTP handler and the
//! terminal client.

use serde::Serialize;

use crate::config::GameConfig;
use crate::feedback::{build_feedback, FeedbackInput};
use crate::lookup::{resolve_profile, ArtistLookup};
use crate::normalize::is_correct_guess;
use crate::types::{FeedbackDetail, PuzzleRecord};

/// Outcome of evaluating one guess against a puzzle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Evaluation {
    pub correct: bool,
    pub feedback: Vec<FeedbackDetail>,
    /// Attempts used once this guess is counted.
    pub attempts_used: u32,
    pub finished: bool,
    pub success: bool,
}

pub struct Evaluator<'a> {
    lookup: &'a dyn ArtistLookup,
    config: &'a GameConfig,
    current_year: i32,
}

impl<'a> Evaluator<'a> {
    pub fn new(lookup: &'a dyn ArtistLookup, config: &'a GameConfig) -> Self {
        Self {
            lookup,
            config,
            current_year: crate::date::today_utc().year(),
        }
    }

    /// Pin the year used to cap estimated lifespans.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Evaluate `guess` as attempt number `attempts_used + 1`.
    ///
    /// Never fails: reference-data problems only make the feedback less
    /// informative.
    pub async fn evaluate(
        &self,
        puzzle: &PuzzleRecord,
        guess: &str,
        attempts_used: u32,
    ) -> Evaluation {
        let correct = is_correct_guess(&puzzle.artist, guess);
        let attempts_used = attempts_used.saturating_add(1);
        let finished = correct || attempts_used >= self.config.max_attempts;

        let feedback = if correct {
            Vec::new()
        } else {
            self.feedback_for(puzzle, guess).await
        };

        tracing::debug!(
            date = %puzzle.date,
            correct,
            attempts_used,
            finished,
            details = feedback.len(),
            "guess evaluated"
        );

        Evaluation {
            correct,
            feedback,
            attempts_used,
            finished,
            success: correct,
        }
    }

    async fn feedback_for(&self, puzzle: &PuzzleRecord, guess: &str) -> Vec<FeedbackDetail> {
        let timeout = self.config.lookup_timeout();
        let guessed = resolve_profile(self.lookup, guess, timeout).await;
        let target = resolve_profile(self.lookup, &puzzle.artist, timeout).await;
        build_feedback(
            FeedbackInput {
                artwork_year: puzzle.artwork_year(),
                target: target.as_ref(),
                guessed: guessed.as_ref(),
                current_year: self.current_year,
            },
            self.config,
        )
    }
}
