use std::fmt;
use thiserror::Error;

use crate::matching::guess_matches_answer;
use crate::model::{CategoryChoice, Question, QuestionId};

/// Questions asked per play-through before the session ends.
pub const QUESTIONS_PER_PLAY: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("{command} is not allowed during {phase}")]
    CommandNotAllowed {
        command: &'static str,
        phase: QuizPhase,
    },

    #[error("no question is loaded yet")]
    NoCurrentQuestion,

    #[error("stale provider response: epoch {response_epoch}, session is at {session_epoch}")]
    StaleResponse {
        response_epoch: u64,
        session_epoch: u64,
    },

    #[error("provider repeated an already-asked question: {0}")]
    RepeatedQuestion(QuestionId),
}

/// Where a session currently is. Derived from state, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    CategorySelection,
    Playing,
    AnswerRevealed,
    Finished,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizPhase::CategorySelection => "category selection",
            QuizPhase::Playing => "play",
            QuizPhase::AnswerRevealed => "answer reveal",
            QuizPhase::Finished => "the final score",
        };
        write!(f, "{label}")
    }
}

/// Everything a provider needs to pick the next unseen question.
///
/// `asked` already includes the still-current question's id, so the provider
/// never hands the same question back. The `epoch` must be echoed when the
/// response is applied; responses from a superseded fetch or a restarted
/// session are rejected as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub epoch: u64,
    pub asked: Vec<QuestionId>,
    pub category: Option<CategoryChoice>,
}

/// Outcome of asking the session to move past a revealed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceStep {
    /// The session wants another question from the provider.
    Fetch(FetchRequest),
    /// The per-play limit is reached; the session is now finished.
    Finished,
}

/// Closed set of player intents, validated against the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    SelectCategory(CategoryChoice),
    UpdateGuess(String),
    SubmitGuess,
    NextQuestion,
    Restart,
}

/// What applying a command asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEffect {
    /// State updated; nothing further to do.
    None,
    /// Ask the provider for the next question and apply the response.
    Fetch(FetchRequest),
    /// The guess was judged; the answer is now revealed.
    Judged { correct: bool },
    /// The session transitioned to the final score.
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Transient state for one play-through of a trivia quiz.
///
/// The session is a plain value mutated only through its transition methods,
/// so it can be unit-tested without any presentation layer. Provider fetches
/// happen outside: transitions that need one hand back a [`FetchRequest`] and
/// the response is fed in through [`QuizSession::apply_next_question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    selected_category: Option<CategoryChoice>,
    asked: Vec<QuestionId>,
    current: Option<Question>,
    answer_revealed: bool,
    correct_count: u32,
    pending_guess: String,
    forced_end: bool,
    epoch: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            selected_category: None,
            asked: Vec::new(),
            current: None,
            answer_revealed: false,
            correct_count: 0,
            pending_guess: String::new(),
            forced_end: false,
            epoch: 0,
        }
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The phase the session is in right now.
    ///
    /// The termination check (question limit or provider exhaustion) runs
    /// before the play/reveal distinction, matching the render order of the
    /// presentation contract.
    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.selected_category.is_none() {
            return QuizPhase::CategorySelection;
        }
        if self.asked.len() >= QUESTIONS_PER_PLAY || self.forced_end {
            return QuizPhase::Finished;
        }
        if self.answer_revealed {
            QuizPhase::AnswerRevealed
        } else {
            QuizPhase::Playing
        }
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&CategoryChoice> {
        self.selected_category.as_ref()
    }

    /// Ids of questions already left behind, in the order they were asked.
    #[must_use]
    pub fn asked(&self) -> &[QuestionId] {
        &self.asked
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn pending_guess(&self) -> &str {
        &self.pending_guess
    }

    /// True when the provider reported no more unseen questions.
    #[must_use]
    pub fn forced_end(&self) -> bool {
        self.forced_end
    }

    /// Epoch of the most recently issued fetch. Bumped per fetch and on
    /// restart, so any earlier outstanding response is stale by construction.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Apply a player command, validated against the current phase.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CommandNotAllowed` when the command is invalid in
    /// the current phase, plus whatever the individual transition reports.
    pub fn apply(&mut self, command: QuizCommand) -> Result<CommandEffect, QuizError> {
        match command {
            QuizCommand::SelectCategory(choice) => {
                let request = self.select_category(choice)?;
                Ok(CommandEffect::Fetch(request))
            }
            QuizCommand::UpdateGuess(text) => {
                self.update_guess(text)?;
                Ok(CommandEffect::None)
            }
            QuizCommand::SubmitGuess => {
                let correct = self.submit_guess()?;
                Ok(CommandEffect::Judged { correct })
            }
            QuizCommand::NextQuestion => match self.next_question()? {
                AdvanceStep::Fetch(request) => Ok(CommandEffect::Fetch(request)),
                AdvanceStep::Finished => Ok(CommandEffect::Finished),
            },
            QuizCommand::Restart => {
                self.restart();
                Ok(CommandEffect::None)
            }
        }
    }

    /// Pick a category and start playing.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CommandNotAllowed` outside category selection.
    pub fn select_category(&mut self, choice: CategoryChoice) -> Result<FetchRequest, QuizError> {
        self.ensure_phase(QuizPhase::CategorySelection, "selecting a category")?;
        self.selected_category = Some(choice);
        self.asked.clear();
        Ok(self.begin_fetch())
    }

    /// Record the guess text verbatim. No normalization happens until submit.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CommandNotAllowed` outside play.
    pub fn update_guess(&mut self, text: impl Into<String>) -> Result<(), QuizError> {
        self.ensure_phase(QuizPhase::Playing, "editing the guess")?;
        self.pending_guess = text.into();
        Ok(())
    }

    /// Judge the pending guess against the current answer and reveal it.
    ///
    /// The score moves by at most one, and only while the answer is still
    /// hidden; submitting again after the reveal is rejected, so re-sent form
    /// events cannot double-count.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CommandNotAllowed` outside play and
    /// `QuizError::NoCurrentQuestion` while the first fetch is outstanding.
    pub fn submit_guess(&mut self) -> Result<bool, QuizError> {
        self.ensure_phase(QuizPhase::Playing, "submitting a guess")?;
        let Some(question) = self.current.as_ref() else {
            return Err(QuizError::NoCurrentQuestion);
        };

        let correct = guess_matches_answer(&self.pending_guess, question.answer());
        if correct {
            self.correct_count += 1;
        }
        self.answer_revealed = true;
        Ok(correct)
    }

    /// Move past a revealed answer.
    ///
    /// Counting the still-current question, reaching the per-play limit ends
    /// the session locally instead of fetching.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CommandNotAllowed` unless an answer is revealed.
    pub fn next_question(&mut self) -> Result<AdvanceStep, QuizError> {
        self.ensure_phase(QuizPhase::AnswerRevealed, "advancing to the next question")?;

        let asked_with_current = self.asked.len() + usize::from(self.current.is_some());
        if asked_with_current >= QUESTIONS_PER_PLAY {
            if let Some(previous) = self.current.take() {
                self.asked.push(previous.id());
            }
            self.answer_revealed = false;
            return Ok(AdvanceStep::Finished);
        }

        Ok(AdvanceStep::Fetch(self.begin_fetch()))
    }

    /// Re-issue the fetch for the first question after a provider failure.
    ///
    /// Only meaningful while playing with no question loaded yet; once a
    /// question is on screen, retries go through
    /// [`QuizSession::next_question`].
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CommandNotAllowed` in any other situation.
    pub fn retry_initial_fetch(&mut self) -> Result<FetchRequest, QuizError> {
        self.ensure_phase(QuizPhase::Playing, "retrying the question fetch")?;
        if self.current.is_some() {
            return Err(QuizError::CommandNotAllowed {
                command: "retrying the question fetch",
                phase: QuizPhase::Playing,
            });
        }
        Ok(self.begin_fetch())
    }

    /// Apply a provider response to an earlier [`FetchRequest`].
    ///
    /// Only now does the superseded question's id land in `asked`; a failed
    /// or stale fetch leaves the session exactly as it was. `None` marks the
    /// category as exhausted and forces the final score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::StaleResponse` when `epoch` is not the session's
    /// newest fetch epoch, and `QuizError::RepeatedQuestion` when the
    /// provider hands back a question the session has already seen.
    pub fn apply_next_question(
        &mut self,
        epoch: u64,
        question: Option<Question>,
    ) -> Result<(), QuizError> {
        if epoch != self.epoch {
            return Err(QuizError::StaleResponse {
                response_epoch: epoch,
                session_epoch: self.epoch,
            });
        }

        if let Some(question) = question.as_ref() {
            let already_seen = self.asked.contains(&question.id())
                || self.current.as_ref().is_some_and(|c| c.id() == question.id());
            if already_seen {
                return Err(QuizError::RepeatedQuestion(question.id()));
            }
        }

        if let Some(previous) = self.current.take() {
            self.asked.push(previous.id());
        }

        match question {
            Some(question) => {
                self.current = Some(question);
                self.pending_guess.clear();
                self.answer_revealed = false;
            }
            None => self.forced_end = true,
        }
        Ok(())
    }

    /// Throw the session away and start over at category selection.
    ///
    /// The epoch moves forward so a response still in flight for the old
    /// session can never touch the new one.
    pub fn restart(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self::default();
        self.epoch = epoch;
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.epoch += 1;

        let mut asked = self.asked.clone();
        if let Some(current) = self.current.as_ref() {
            asked.push(current.id());
        }
        FetchRequest {
            epoch: self.epoch,
            asked,
            category: self.selected_category.clone(),
        }
    }

    fn ensure_phase(&self, expected: QuizPhase, command: &'static str) -> Result<(), QuizError> {
        let phase = self.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(QuizError::CommandNotAllowed { command, phase })
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, CategoryId};

    fn question(id: u64, prompt: &str, answer: &str) -> Question {
        Question::new(QuestionId::new(id), prompt, answer).unwrap()
    }

    fn science() -> CategoryChoice {
        CategoryChoice::One(Category::new(CategoryId::new(1), "Science").unwrap())
    }

    /// Session with one question loaded and ready to answer.
    fn playing_session() -> QuizSession {
        let mut session = QuizSession::new();
        let request = session.select_category(science()).unwrap();
        session
            .apply_next_question(request.epoch, Some(question(1, "Which mission?", "Apollo 13")))
            .unwrap();
        session
    }

    #[test]
    fn fresh_session_is_at_category_selection() {
        let session = QuizSession::new();
        assert_eq!(session.phase(), QuizPhase::CategorySelection);
        assert!(session.asked().is_empty());
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn select_category_issues_a_fetch_and_enters_play() {
        let mut session = QuizSession::new();
        let request = session.select_category(CategoryChoice::All).unwrap();

        assert_eq!(session.phase(), QuizPhase::Playing);
        assert!(request.asked.is_empty());
        assert_eq!(request.category, Some(CategoryChoice::All));
        assert_eq!(request.epoch, session.epoch());
    }

    #[test]
    fn select_category_is_rejected_mid_play() {
        let mut session = playing_session();
        let err = session.select_category(CategoryChoice::All).unwrap_err();
        assert!(matches!(err, QuizError::CommandNotAllowed { .. }));
    }

    #[test]
    fn guess_is_stored_verbatim() {
        let mut session = playing_session();
        session.update_guess("  It was Apollo, 13! ").unwrap();
        assert_eq!(session.pending_guess(), "  It was Apollo, 13! ");
    }

    #[test]
    fn correct_guess_scores_and_reveals() {
        let mut session = playing_session();
        session.update_guess("it was apollo, 13!").unwrap();

        let correct = session.submit_guess().unwrap();

        assert!(correct);
        assert_eq!(session.correct_count(), 1);
        assert!(session.answer_revealed());
        assert_eq!(session.phase(), QuizPhase::AnswerRevealed);
    }

    #[test]
    fn incorrect_guess_reveals_without_scoring() {
        let mut session = playing_session();
        session.update_guess("gemini").unwrap();

        let correct = session.submit_guess().unwrap();

        assert!(!correct);
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.phase(), QuizPhase::AnswerRevealed);
    }

    #[test]
    fn resubmitting_after_reveal_is_rejected_and_changes_nothing() {
        let mut session = playing_session();
        session.update_guess("apollo 13").unwrap();
        session.submit_guess().unwrap();
        let before = session.clone();

        let err = session.submit_guess().unwrap_err();

        assert!(matches!(err, QuizError::CommandNotAllowed { .. }));
        assert_eq!(session, before);
    }

    #[test]
    fn asked_id_is_recorded_only_when_superseded() {
        let mut session = playing_session();
        assert!(session.asked().is_empty());

        session.update_guess("apollo 13").unwrap();
        session.submit_guess().unwrap();
        let AdvanceStep::Fetch(request) = session.next_question().unwrap() else {
            panic!("expected a fetch");
        };
        assert_eq!(request.asked, vec![QuestionId::new(1)]);
        // Not yet recorded locally while the fetch is in flight.
        assert!(session.asked().is_empty());

        session
            .apply_next_question(request.epoch, Some(question(2, "Who played Lovell?", "Tom Hanks")))
            .unwrap();
        assert_eq!(session.asked(), &[QuestionId::new(1)]);
        assert_eq!(session.pending_guess(), "");
        assert!(!session.answer_revealed());
    }

    #[test]
    fn failed_fetch_leaves_state_unchanged_for_retry() {
        let mut session = playing_session();
        session.update_guess("apollo 13").unwrap();
        session.submit_guess().unwrap();
        let AdvanceStep::Fetch(first) = session.next_question().unwrap() else {
            panic!("expected a fetch");
        };

        // The provider failed; the user re-triggers the advance.
        let AdvanceStep::Fetch(retry) = session.next_question().unwrap() else {
            panic!("expected a fetch");
        };
        assert_eq!(retry.asked, first.asked);
        assert!(retry.epoch > first.epoch);

        // The original response arriving late is now stale.
        let err = session
            .apply_next_question(first.epoch, Some(question(2, "Q2", "A2")))
            .unwrap_err();
        assert!(matches!(err, QuizError::StaleResponse { .. }));
        assert!(session.asked().is_empty());
    }

    #[test]
    fn exhausted_provider_forces_the_final_score() {
        let mut session = playing_session();
        session.submit_guess().unwrap();
        let AdvanceStep::Fetch(request) = session.next_question().unwrap() else {
            panic!("expected a fetch");
        };

        session.apply_next_question(request.epoch, None).unwrap();

        assert!(session.forced_end());
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.asked(), &[QuestionId::new(1)]);
        assert!(session.asked().len() < QUESTIONS_PER_PLAY);
    }

    #[test]
    fn full_play_through_ends_at_the_question_limit() {
        let mut session = QuizSession::new();
        let mut request = session.select_category(science()).unwrap();

        for index in 0..QUESTIONS_PER_PLAY {
            let id = index as u64 + 1;
            session
                .apply_next_question(request.epoch, Some(question(id, "Which mission?", "Apollo 13")))
                .unwrap();
            session.update_guess("apollo 13").unwrap();
            session.submit_guess().unwrap();

            match session.next_question().unwrap() {
                AdvanceStep::Fetch(next) => request = next,
                AdvanceStep::Finished => {
                    assert_eq!(index + 1, QUESTIONS_PER_PLAY);
                    break;
                }
            }
        }

        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.asked().len(), QUESTIONS_PER_PLAY);
        // The transition to the final score never touches the score itself.
        assert_eq!(session.correct_count(), QUESTIONS_PER_PLAY as u32);
    }

    #[test]
    fn asked_never_contains_duplicates() {
        let mut session = playing_session();
        session.submit_guess().unwrap();
        let AdvanceStep::Fetch(request) = session.next_question().unwrap() else {
            panic!("expected a fetch");
        };

        let err = session
            .apply_next_question(request.epoch, Some(question(1, "Which mission?", "Apollo 13")))
            .unwrap_err();

        assert_eq!(err, QuizError::RepeatedQuestion(QuestionId::new(1)));
        assert!(session.asked().is_empty());
    }

    #[test]
    fn correct_count_never_exceeds_questions_seen() {
        let mut session = QuizSession::new();
        let mut request = session.select_category(CategoryChoice::All).unwrap();

        for id in 1..=3_u64 {
            session
                .apply_next_question(request.epoch, Some(question(id, "Q", "apollo")))
                .unwrap();
            session.update_guess("apollo").unwrap();
            session.submit_guess().unwrap();
            let superseded = session.asked().len() as u32 + 1;
            assert!(session.correct_count() <= superseded);

            let AdvanceStep::Fetch(next) = session.next_question().unwrap() else {
                panic!("expected a fetch");
            };
            request = next;
        }
    }

    #[test]
    fn restart_resets_everything_and_bumps_the_epoch() {
        let mut session = playing_session();
        session.update_guess("apollo 13").unwrap();
        session.submit_guess().unwrap();
        let old_epoch = session.epoch();

        session.restart();

        assert_eq!(session.phase(), QuizPhase::CategorySelection);
        assert!(session.asked().is_empty());
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.pending_guess(), "");
        assert!(session.current_question().is_none());
        assert!(!session.forced_end());
        assert!(session.epoch() > old_epoch);
    }

    #[test]
    fn response_for_a_previous_session_is_discarded_after_restart() {
        let mut session = QuizSession::new();
        let request = session.select_category(CategoryChoice::All).unwrap();

        session.restart();
        let err = session
            .apply_next_question(request.epoch, Some(question(1, "Q", "A")))
            .unwrap_err();

        assert!(matches!(err, QuizError::StaleResponse { .. }));
        assert_eq!(session.phase(), QuizPhase::CategorySelection);
    }

    #[test]
    fn initial_fetch_can_be_retried_until_a_question_lands() {
        let mut session = QuizSession::new();
        let first = session.select_category(CategoryChoice::All).unwrap();

        // The first fetch failed; no response was ever applied.
        let retry = session.retry_initial_fetch().unwrap();
        assert!(retry.epoch > first.epoch);
        assert!(retry.asked.is_empty());

        session
            .apply_next_question(retry.epoch, Some(question(1, "Q", "A")))
            .unwrap();
        let err = session.retry_initial_fetch().unwrap_err();
        assert!(matches!(err, QuizError::CommandNotAllowed { .. }));
    }

    #[test]
    fn submit_without_a_loaded_question_is_rejected() {
        let mut session = QuizSession::new();
        session.select_category(CategoryChoice::All).unwrap();
        let err = session.submit_guess().unwrap_err();
        assert_eq!(err, QuizError::NoCurrentQuestion);
    }

    #[test]
    fn commands_dispatch_through_the_typed_interface() {
        let mut session = QuizSession::new();

        let effect = session
            .apply(QuizCommand::SelectCategory(CategoryChoice::All))
            .unwrap();
        let CommandEffect::Fetch(request) = effect else {
            panic!("expected a fetch effect");
        };
        session
            .apply_next_question(request.epoch, Some(question(1, "Which mission?", "Apollo 13")))
            .unwrap();

        session
            .apply(QuizCommand::UpdateGuess("apollo 13".into()))
            .unwrap();
        let effect = session.apply(QuizCommand::SubmitGuess).unwrap();
        assert_eq!(effect, CommandEffect::Judged { correct: true });

        let err = session.apply(QuizCommand::UpdateGuess("late".into())).unwrap_err();
        assert!(matches!(err, QuizError::CommandNotAllowed { .. }));

        let effect = session.apply(QuizCommand::Restart).unwrap();
        assert_eq!(effect, CommandEffect::None);
        assert_eq!(session.phase(), QuizPhase::CategorySelection);
    }
}
