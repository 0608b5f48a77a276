use trivia_core::guess_matches_answer;
use trivia_core::model::{CategoryChoice, QuizPhase, QuizSession, QUESTIONS_PER_PLAY};

use services::QuizFlowService;

use crate::views::ViewError;

/// Screen the play view should render, derived from the session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizScreen {
    CategoryChooser,
    Question,
    Answer,
    FinalScore,
}

/// Play-view state: one quiz session plus the service that feeds it.
///
/// All provider round-trips run through the flow service, which applies
/// responses under the issuing fetch's epoch; a response that raced a restart
/// is swallowed here rather than surfaced as an error.
pub struct QuizVm {
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: QuizSession::new(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreen {
        match self.session.phase() {
            QuizPhase::CategorySelection => QuizScreen::CategoryChooser,
            QuizPhase::Playing => QuizScreen::Question,
            QuizPhase::AnswerRevealed => QuizScreen::Answer,
            QuizPhase::Finished => QuizScreen::FinalScore,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.session.current_question().map(|q| q.prompt())
    }

    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.session.current_question().map(|q| q.answer())
    }

    #[must_use]
    pub fn guess(&self) -> &str {
        self.session.pending_guess()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.correct_count()
    }

    /// 1-based position of the question on screen.
    #[must_use]
    pub fn question_number(&self) -> usize {
        (self.session.asked().len() + 1).min(QUESTIONS_PER_PLAY)
    }

    #[must_use]
    pub fn questions_per_play(&self) -> usize {
        QUESTIONS_PER_PLAY
    }

    /// Whether the revealed answer was matched by the submitted guess.
    ///
    /// Recomputed from the retained guess, so the reveal screen needs no
    /// extra stored judgement.
    #[must_use]
    pub fn was_correct(&self) -> Option<bool> {
        if !self.session.answer_revealed() {
            return None;
        }
        self.session
            .current_question()
            .map(|q| guess_matches_answer(self.session.pending_guess(), q.answer()))
    }

    /// Record a keystroke. A keystroke that races the reveal is dropped
    /// rather than reported; the input is gone from the screen by then.
    pub fn update_guess(&mut self, text: String) {
        let _ = self.session.update_guess(text);
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when submission is invalid for the
    /// current phase.
    pub fn submit_guess(&mut self) -> Result<bool, ViewError> {
        self.session.submit_guess().map_err(|_| ViewError::Unknown)
    }

    /// # Errors
    ///
    /// Returns `ViewError::LoadQuestion` when the provider fails; the session
    /// is untouched and the same action can be retried.
    pub async fn select_category(
        &mut self,
        flow: &QuizFlowService,
        choice: CategoryChoice,
    ) -> Result<(), ViewError> {
        match flow.select_category(&mut self.session, choice).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_stale_response() => Ok(()),
            Err(_) => Err(ViewError::LoadQuestion),
        }
    }

    /// Re-run the first fetch after a failed category selection.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::LoadQuestion` when the provider fails again.
    pub async fn retry_initial(&mut self, flow: &QuizFlowService) -> Result<(), ViewError> {
        match flow.retry_initial(&mut self.session).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_stale_response() => Ok(()),
            Err(_) => Err(ViewError::LoadQuestion),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::LoadQuestion` when the provider fails; the session
    /// is untouched and the same action can be retried.
    pub async fn next_question(&mut self, flow: &QuizFlowService) -> Result<(), ViewError> {
        match flow.advance(&mut self.session).await {
            Ok(_finished_locally) => Ok(()),
            Err(err) if err.is_stale_response() => Ok(()),
            Err(_) => Err(ViewError::LoadQuestion),
        }
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }
}

impl Default for QuizVm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl QuizVm {
    pub(crate) fn from_session(session: QuizSession) -> Self {
        Self { session }
    }
}
