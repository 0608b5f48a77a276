use std::sync::Arc;

use trivia_core::model::{AdvanceStep, Category, CategoryChoice, FetchRequest, QuizSession};

use crate::error::QuizFlowError;
use crate::provider::QuestionProvider;

/// Drives one quiz session against a question provider.
///
/// The session stays a plain value owned by the caller; this service only
/// runs the fetch handshake around its transitions. Every response is applied
/// under the epoch of the request that produced it, so a response that lost
/// the race against a newer fetch or a restart can never land.
#[derive(Clone)]
pub struct QuizFlowService {
    provider: Arc<dyn QuestionProvider>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(provider: Arc<dyn QuestionProvider>) -> Self {
        Self { provider }
    }

    /// Categories for the session-start chooser.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Provider` on service failures.
    pub async fn list_categories(&self) -> Result<Vec<Category>, QuizFlowError> {
        Ok(self.provider.list_categories().await?)
    }

    /// Pick a category and load the first question.
    ///
    /// On provider failure the session stays in play with no question loaded;
    /// [`QuizFlowService::retry_initial`] re-triggers the fetch.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError` when the command is invalid for the current
    /// phase or the provider fails.
    pub async fn select_category(
        &self,
        session: &mut QuizSession,
        choice: CategoryChoice,
    ) -> Result<(), QuizFlowError> {
        let request = session.select_category(choice)?;
        self.fetch_and_apply(session, request).await
    }

    /// Re-run a failed first fetch.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError` when a question is already loaded or the
    /// provider fails again.
    pub async fn retry_initial(&self, session: &mut QuizSession) -> Result<(), QuizFlowError> {
        let request = session.retry_initial_fetch()?;
        self.fetch_and_apply(session, request).await
    }

    /// Move past a revealed answer, fetching when the session wants more.
    ///
    /// Returns `true` when the session finished locally at the question limit
    /// without a provider round-trip.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError` when the command is invalid for the current
    /// phase or the provider fails; session state is untouched by provider
    /// failures, so the same call can simply be retried.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<bool, QuizFlowError> {
        match session.next_question()? {
            AdvanceStep::Fetch(request) => {
                self.fetch_and_apply(session, request).await?;
                Ok(false)
            }
            AdvanceStep::Finished => Ok(true),
        }
    }

    async fn fetch_and_apply(
        &self,
        session: &mut QuizSession,
        request: FetchRequest,
    ) -> Result<(), QuizFlowError> {
        let question = self
            .provider
            .next_question(&request.asked, request.category.as_ref())
            .await?;
        session.apply_next_question(request.epoch, question)?;
        Ok(())
    }
}
