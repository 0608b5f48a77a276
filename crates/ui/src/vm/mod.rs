mod question_vm;
mod quiz_vm;

pub use question_vm::{map_question_row, map_question_rows, page_count, QuestionRowVm};
pub use quiz_vm::{QuizScreen, QuizVm};
