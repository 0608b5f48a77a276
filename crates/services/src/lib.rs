#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod quiz_flow;
pub mod trivia_api;

pub use error::{ProviderError, QuizFlowError};
pub use provider::{
    InMemoryProvider, QuestionDraft, QuestionListItem, QuestionPage, QuestionProvider,
    QUESTIONS_PER_PAGE,
};
pub use quiz_flow::QuizFlowService;
pub use trivia_api::{TriviaApi, TriviaApiConfig};
