use std::sync::Arc;

use services::{QuestionProvider, QuizFlowService};

/// Services the composition root (the binary crate) hands to the UI.
pub trait UiApp: Send + Sync {
    fn quiz_flow(&self) -> Arc<QuizFlowService>;
    fn provider(&self) -> Arc<dyn QuestionProvider>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_flow: Arc<QuizFlowService>,
    provider: Arc<dyn QuestionProvider>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_flow: app.quiz_flow(),
            provider: app.provider(),
        }
    }

    #[must_use]
    pub fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }

    #[must_use]
    pub fn provider(&self) -> Arc<dyn QuestionProvider> {
        Arc::clone(&self.provider)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
