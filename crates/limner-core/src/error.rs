use thiserror::Error;

/// A guess the session refused to record. None of these consume an attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("guess is empty")]
    EmptyGuess,
    #[error("'{0}' is not a known artist; pick a name from the suggestions")]
    NotInSuggestions(String),
    #[error("'{0}' was already guessed")]
    DuplicateGuess(String),
    #[error("puzzle is already finished")]
    AlreadyFinished,
    #[error("a guess is already being checked")]
    SubmissionInFlight,
    #[error("no attempts left ({used} of {max} used)")]
    AttemptsExhausted { used: u32, max: u32 },
}

/// Request-level failures of the game surface (HTTP, CLI).
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("malformed date: {0}")]
    MalformedDate(String),
    #[error("no puzzle for {0}")]
    PuzzleNotFound(String),
    #[error("reference data unavailable: {0}")]
    ReferenceDataUnavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
