use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{InMemoryProvider, QuestionProvider, QuizFlowService};
use trivia_core::model::{Category, CategoryId, Question, QuestionId};

use crate::context::{UiApp, build_app_context};
use crate::views::play::PlayTestHandles;
use crate::views::{AddQuestionView, PlayView, QuestionsView};

#[derive(Clone)]
struct TestApp {
    quiz_flow: Arc<QuizFlowService>,
    provider: Arc<dyn QuestionProvider>,
}

impl UiApp for TestApp {
    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }

    fn provider(&self) -> Arc<dyn QuestionProvider> {
        Arc::clone(&self.provider)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Play,
    Questions,
    Add,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    play_handles: Option<PlayTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.play_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Play => rsx! { PlayView {} },
        ViewKind::Questions => rsx! { QuestionsView {} },
        ViewKind::Add => rsx! { AddQuestionView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub play_handles: Option<PlayTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn seeded_provider() -> Arc<InMemoryProvider> {
    let provider = InMemoryProvider::new();
    provider.add_category(Category::new(CategoryId::new(1), "Science").unwrap());
    provider.add_category(Category::new(CategoryId::new(2), "History").unwrap());
    for id in 1..=6_u64 {
        provider.add_question(
            Question::new(QuestionId::new(id), format!("Science Q{id}"), "apollo 13").unwrap(),
            CategoryId::new(1),
            2,
        );
    }
    provider.add_question(
        Question::new(QuestionId::new(7), "Who unified Egypt?", "Menes").unwrap(),
        CategoryId::new(2),
        4,
    );
    Arc::new(provider)
}

pub fn setup_view_harness(view: ViewKind, provider: Arc<dyn QuestionProvider>) -> ViewHarness {
    let quiz_flow = Arc::new(QuizFlowService::new(Arc::clone(&provider)));
    let play_handles = matches!(view, ViewKind::Play).then(PlayTestHandles::default);

    let app = Arc::new(TestApp { quiz_flow, provider });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            play_handles: play_handles.clone(),
        },
    );

    ViewHarness { dom, play_handles }
}
