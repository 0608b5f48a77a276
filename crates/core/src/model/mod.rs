mod category;
mod ids;
mod question;
mod quiz;

pub use ids::{CategoryId, ParseIdError, QuestionId};

pub use category::{Category, CategoryChoice, CategoryError};
pub use question::{Question, QuestionError};
pub use quiz::{
    AdvanceStep, CommandEffect, FetchRequest, QuizCommand, QuizError, QuizPhase, QuizSession,
    QUESTIONS_PER_PLAY,
};
