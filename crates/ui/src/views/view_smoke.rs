use std::sync::Arc;

use async_trait::async_trait;
use dioxus::prelude::WritableExt;
use services::{
    InMemoryProvider, ProviderError, QuestionDraft, QuestionPage, QuestionProvider,
};
use trivia_core::model::{
    AdvanceStep, Category, CategoryChoice, CategoryId, Question, QuestionId, QuizSession,
};

use crate::vm::QuizVm;

use super::test_harness::{drive_dom, seeded_provider, setup_view_harness, ViewKind};

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_renders_the_category_chooser() {
    let mut harness = setup_view_harness(ViewKind::Play, seeded_provider());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Choose Category"), "missing header in {html}");
    assert!(html.contains("ALL"), "missing all button in {html}");
    assert!(html.contains("Science"), "missing category in {html}");
    assert!(html.contains("History"), "missing category in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_renders_the_final_score() {
    let mut harness = setup_view_harness(ViewKind::Play, seeded_provider());
    harness.rebuild();
    harness.drive_async().await;

    // Walk a session to the question limit off-screen, then hand it to the
    // mounted view.
    let mut session = QuizSession::new();
    let mut request = session.select_category(CategoryChoice::All).unwrap();
    loop {
        session
            .apply_next_question(
                request.epoch,
                Some(
                    Question::new(
                        QuestionId::new(request.asked.len() as u64 + 1),
                        "Which mission?",
                        "apollo 13",
                    )
                    .unwrap(),
                ),
            )
            .unwrap();
        session.update_guess("apollo 13").unwrap();
        session.submit_guess().unwrap();
        match session.next_question().unwrap() {
            AdvanceStep::Fetch(next) => request = next,
            AdvanceStep::Finished => break,
        }
    }

    let mut vm = harness
        .play_handles
        .clone()
        .expect("play handles present")
        .vm();
    vm.set(Some(QuizVm::from_session(session)));
    drive_dom(&mut harness.dom);

    let html = harness.render();
    assert!(
        html.contains("Your Final Score is 5"),
        "missing score in {html}"
    );
    assert!(html.contains("Play Again?"), "missing restart in {html}");
}

struct FailingProvider;

#[async_trait]
impl QuestionProvider for FailingProvider {
    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn next_question(
        &self,
        _asked: &[QuestionId],
        _category: Option<&CategoryChoice>,
    ) -> Result<Option<Question>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn list_questions(&self, _page: u32) -> Result<QuestionPage, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn search_questions(&self, _term: &str) -> Result<QuestionPage, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn questions_in_category(
        &self,
        _category: CategoryId,
        _page: u32,
    ) -> Result<QuestionPage, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn create_question(&self, _draft: &QuestionDraft) -> Result<QuestionId, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn delete_question(&self, _id: QuestionId) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_renders_the_category_error_state() {
    let mut harness = setup_view_harness(ViewKind::Play, Arc::new(FailingProvider));
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Unable to load categories"),
        "missing error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn questions_view_smoke_renders_rows_filter_and_pager() {
    let mut harness = setup_view_harness(ViewKind::Questions, seeded_provider());
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Science Q1"), "missing row in {html}");
    assert!(
        html.contains("All categories"),
        "missing category filter in {html}"
    );
    assert!(html.contains("History"), "missing filter option in {html}");
    assert!(html.contains("Search"), "missing search control in {html}");
    assert!(html.contains("Page 1 of 1"), "missing pager in {html}");
    assert!(html.contains("Delete"), "missing delete control in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn questions_view_smoke_renders_the_error_state() {
    let mut harness = setup_view_harness(ViewKind::Questions, Arc::new(FailingProvider));
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Unable to load questions"),
        "missing error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn add_view_smoke_renders_the_form() {
    let provider: Arc<InMemoryProvider> = seeded_provider();
    let mut harness = setup_view_harness(ViewKind::Add, provider);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Add a New Trivia Question"),
        "missing title in {html}"
    );
    assert!(html.contains("Question"), "missing prompt field in {html}");
    assert!(html.contains("Answer"), "missing answer field in {html}");
    assert!(html.contains("Difficulty"), "missing difficulty in {html}");
    assert!(html.contains("Science"), "missing category option in {html}");
    assert!(html.contains("Submit"), "missing submit in {html}");
}
