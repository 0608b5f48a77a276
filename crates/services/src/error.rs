//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::model::{CategoryError, QuestionError, QuizError};

/// Errors emitted by question providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("question service is unreachable: {0}")]
    Unavailable(String),

    #[error("question service request timed out")]
    Timeout,

    #[error("question service returned status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("malformed question service response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// Errors emitted by `QuizFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl QuizFlowError {
    /// True when a provider response lost the race against a newer fetch or a
    /// restart. Callers drop these silently instead of surfacing an error.
    #[must_use]
    pub fn is_stale_response(&self) -> bool {
        matches!(self, QuizFlowError::Quiz(QuizError::StaleResponse { .. }))
    }
}
