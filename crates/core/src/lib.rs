#![forbid(unsafe_code)]

pub mod matching;
pub mod model;

pub use matching::{guess_matches_answer, normalize};
pub use model::{
    AdvanceStep, Category, CategoryChoice, CategoryError, CategoryId, CommandEffect, FetchRequest,
    Question, QuestionError, QuestionId, QuizCommand, QuizError, QuizPhase, QuizSession,
    QUESTIONS_PER_PLAY,
};
