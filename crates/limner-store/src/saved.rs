//! Client-side saved sessions, one JSON record per puzzle.

use std::path::Path;

use limner_core::session::SessionState;
use limner_core::GuessAttempt;
use serde::{Deserialize, Serialize};

use crate::paths::LimnerPaths;
use crate::write_atomic;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub puzzle_id: String,
    pub max_attempts: u32,
    /// Text typed but not yet submitted.
    #[serde(default)]
    pub current_guess: String,
    pub finished: bool,
    pub success: bool,
    #[serde(default)]
    pub gave_up: bool,
    #[serde(default)]
    pub attempts_history: Vec<GuessAttempt>,
    /// Owned by whatever records finished plays; carried across saves.
    #[serde(default)]
    pub play_saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SavedSession {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            puzzle_id: state.puzzle_id.clone(),
            max_attempts: state.max_attempts,
            current_guess: String::new(),
            finished: state.finished,
            success: state.success,
            gave_up: state.gave_up,
            attempts_history: state.attempts.clone(),
            play_saved: false,
            updated_at: Some(limner_core::date::now_rfc3339()),
        }
    }

    /// Keep the fields the session state does not own from an earlier
    /// record of the same puzzle.
    pub fn carry_over(mut self, previous: &SavedSession) -> Self {
        if previous.puzzle_id != self.puzzle_id {
            return self;
        }
        self.play_saved = previous.play_saved;
        let submitted = self
            .attempts_history
            .iter()
            .any(|a| limner_core::normalize::same_text(&a.guess, &previous.current_guess));
        if !self.finished && !submitted {
            self.current_guess = previous.current_guess.clone();
        }
        self
    }

    /// Rebuild session state. Attempts used are derived from the history so
    /// a hand-edited record cannot desynchronize them; history past
    /// `max_attempts` is dropped.
    pub fn to_state(&self) -> SessionState {
        let kept = self.attempts_history.len().min(self.max_attempts as usize);
        let attempts: Vec<GuessAttempt> = self.attempts_history[..kept].to_vec();
        let attempts_used = attempts.len() as u32;
        let success = attempts.iter().any(|a| a.correct);
        let finished = self.finished || success || attempts_used >= self.max_attempts;
        SessionState {
            puzzle_id: self.puzzle_id.clone(),
            max_attempts: self.max_attempts,
            attempts_used,
            finished,
            success,
            gave_up: self.gave_up,
            attempts,
        }
    }
}

/// Saved sessions under `sessions/`.
pub struct SessionStore {
    paths: LimnerPaths,
}

impl SessionStore {
    pub fn new(paths: LimnerPaths) -> Self {
        Self { paths }
    }

    pub fn load(&self, puzzle_id: &str) -> anyhow::Result<Option<SavedSession>> {
        let path = self.paths.session_file(puzzle_id);
        if !path.exists() {
            return Ok(None);
        }
        read_saved(&path).map(Some)
    }

    /// Load, discarding records that no longer parse.
    pub fn load_or_discard(&self, puzzle_id: &str) -> Option<SavedSession> {
        match self.load(puzzle_id) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(puzzle_id, error = %e, "ignoring unreadable saved session");
                None
            }
        }
    }

    /// Save `state`, keeping `playSaved` and any unsent guess from the
    /// record already on disk.
    pub fn save_state(&self, state: &SessionState) -> anyhow::Result<SavedSession> {
        let mut saved = SavedSession::from_state(state);
        if let Some(previous) = self.load_or_discard(&state.puzzle_id) {
            saved = saved.carry_over(&previous);
        }
        self.save(&saved)?;
        Ok(saved)
    }

    pub fn save(&self, saved: &SavedSession) -> anyhow::Result<()> {
        let path = self.paths.session_file(&saved.puzzle_id);
        let json = serde_json::to_string_pretty(saved)?;
        write_atomic(&path, json.as_bytes())
    }

    pub fn remove(&self, puzzle_id: &str) -> anyhow::Result<bool> {
        let path = self.paths.session_file(puzzle_id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}

fn read_saved(path: &Path) -> anyhow::Result<SavedSession> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
