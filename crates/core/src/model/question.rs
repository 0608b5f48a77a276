use thiserror::Error;

use crate::model::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question answer is empty")]
    EmptyAnswer,
}

/// A trivia question as supplied by the question provider.
///
/// Immutable once fetched. A question with a blank prompt or answer is a
/// provider precondition violation and never enters a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    answer: String,
}

impl Question {
    /// Build a question from provider data.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyAnswer`
    /// when the respective field is blank.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        Ok(Self { id, prompt, answer })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}
