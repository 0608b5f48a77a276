use services::{QuestionListItem, QuestionPage, QUESTIONS_PER_PAGE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRowVm {
    pub id: u64,
    pub prompt: String,
    pub answer: String,
    pub category_label: String,
    pub difficulty_label: String,
}

#[must_use]
pub fn map_question_row(item: &QuestionListItem) -> QuestionRowVm {
    QuestionRowVm {
        id: item.id.value(),
        prompt: item.prompt.clone(),
        answer: item.answer.clone(),
        category_label: item
            .category_label
            .clone()
            .unwrap_or_else(|| "Uncategorized".to_string()),
        difficulty_label: format!("Difficulty: {}", item.difficulty),
    }
}

#[must_use]
pub fn map_question_rows(page: &QuestionPage) -> Vec<QuestionRowVm> {
    page.questions.iter().map(map_question_row).collect()
}

/// Number of pages needed for `total` questions, at least one.
#[must_use]
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(QUESTIONS_PER_PAGE as u64).max(1)
}
