use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use trivia_core::model::{Category, CategoryChoice, CategoryId, Question, QuestionId};

use crate::error::ProviderError;

/// Questions per page in management listings, matching the server.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// A question as it appears in management listings, carrying the category
/// label and difficulty alongside the play fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionListItem {
    pub id: QuestionId,
    pub prompt: String,
    pub answer: String,
    pub category_label: Option<String>,
    pub difficulty: u32,
}

/// One page of a question listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPage {
    pub questions: Vec<QuestionListItem>,
    pub total: u64,
}

impl QuestionPage {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            questions: Vec::new(),
            total: 0,
        }
    }
}

/// Fields required to create a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub answer: String,
    pub category_id: CategoryId,
    pub difficulty: u32,
}

/// External source of categories and questions.
///
/// `next_question` is the play contract: given the ids a session has already
/// seen and an optional category filter, hand back an unseen question or
/// `None` once the pool is exhausted. The remaining operations are the
/// management surface of the same service.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// List every category.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the service cannot be reached or the
    /// response is malformed.
    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError>;

    /// Pick the next unseen question, or `None` when none are left.
    ///
    /// `None` for `category` (or `CategoryChoice::All`) draws from every
    /// category.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the service cannot be reached or hands
    /// back a question that fails validation.
    async fn next_question(
        &self,
        asked: &[QuestionId],
        category: Option<&CategoryChoice>,
    ) -> Result<Option<Question>, ProviderError>;

    /// Fetch one page of questions (1-based page index).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on service failures.
    async fn list_questions(&self, page: u32) -> Result<QuestionPage, ProviderError>;

    /// Questions whose prompt contains `term`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on service failures.
    async fn search_questions(&self, term: &str) -> Result<QuestionPage, ProviderError>;

    /// Fetch one page of questions in a single category (1-based page index).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on service failures.
    async fn questions_in_category(
        &self,
        category: CategoryId,
        page: u32,
    ) -> Result<QuestionPage, ProviderError>;

    /// Create a question and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the service rejects the draft.
    async fn create_question(&self, draft: &QuestionDraft) -> Result<QuestionId, ProviderError>;

    /// Delete a question by id.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the question is missing or the service
    /// fails.
    async fn delete_question(&self, id: QuestionId) -> Result<(), ProviderError>;
}

//
// ─── IN-MEMORY PROVIDER ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct BankEntry {
    question: Question,
    category_id: CategoryId,
    difficulty: u32,
}

/// Deterministic in-memory question bank for tests and prototyping.
///
/// Unlike the live service, which picks randomly among the unseen pool, this
/// one always hands out the first unseen question in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    categories: Arc<Mutex<Vec<Category>>>,
    bank: Arc<Mutex<Vec<BankEntry>>>,
    next_id: Arc<Mutex<u64>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category.
    pub fn add_category(&self, category: Category) {
        let mut guard = self.categories.lock().unwrap_or_else(|e| e.into_inner());
        guard.push(category);
    }

    /// Add a question to the bank under a category.
    pub fn add_question(&self, question: Question, category_id: CategoryId, difficulty: u32) {
        let mut guard = self.bank.lock().unwrap_or_else(|e| e.into_inner());
        guard.push(BankEntry {
            question,
            category_id,
            difficulty,
        });
    }

    fn page_of(entries: &[BankEntry], page: u32) -> QuestionPage {
        let total = entries.len() as u64;
        let start = (page.max(1) as usize - 1) * QUESTIONS_PER_PAGE;
        let questions = entries
            .iter()
            .skip(start)
            .take(QUESTIONS_PER_PAGE)
            .map(|entry| QuestionListItem {
                id: entry.question.id(),
                prompt: entry.question.prompt().to_string(),
                answer: entry.question.answer().to_string(),
                category_label: None,
                difficulty: entry.difficulty,
            })
            .collect();
        QuestionPage { questions, total }
    }
}

#[async_trait]
impl QuestionProvider for InMemoryProvider {
    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError> {
        let guard = self.categories.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    async fn next_question(
        &self,
        asked: &[QuestionId],
        category: Option<&CategoryChoice>,
    ) -> Result<Option<Question>, ProviderError> {
        let guard = self.bank.lock().unwrap_or_else(|e| e.into_inner());
        let wanted_category = category.and_then(|choice| match choice {
            CategoryChoice::All => None,
            CategoryChoice::One(cat) => Some(cat.id()),
        });

        let next = guard.iter().find(|entry| {
            let unseen = !asked.contains(&entry.question.id());
            let in_category = wanted_category.is_none_or(|id| entry.category_id == id);
            unseen && in_category
        });
        Ok(next.map(|entry| entry.question.clone()))
    }

    async fn list_questions(&self, page: u32) -> Result<QuestionPage, ProviderError> {
        let guard = self.bank.lock().unwrap_or_else(|e| e.into_inner());
        Ok(Self::page_of(&guard, page))
    }

    async fn search_questions(&self, term: &str) -> Result<QuestionPage, ProviderError> {
        let guard = self.bank.lock().unwrap_or_else(|e| e.into_inner());
        let term = term.to_lowercase();
        let matching: Vec<BankEntry> = guard
            .iter()
            .filter(|entry| entry.question.prompt().to_lowercase().contains(&term))
            .cloned()
            .collect();
        Ok(Self::page_of(&matching, 1))
    }

    async fn questions_in_category(
        &self,
        category: CategoryId,
        page: u32,
    ) -> Result<QuestionPage, ProviderError> {
        let guard = self.bank.lock().unwrap_or_else(|e| e.into_inner());
        let matching: Vec<BankEntry> = guard
            .iter()
            .filter(|entry| entry.category_id == category)
            .cloned()
            .collect();
        Ok(Self::page_of(&matching, page))
    }

    async fn create_question(&self, draft: &QuestionDraft) -> Result<QuestionId, ProviderError> {
        let id = {
            let bank = self.bank.lock().unwrap_or_else(|e| e.into_inner());
            let mut guard = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            let max_existing = bank
                .iter()
                .map(|entry| entry.question.id().value())
                .max()
                .unwrap_or(0);
            *guard = (*guard).max(max_existing) + 1;
            QuestionId::new(*guard)
        };
        let question = Question::new(id, draft.prompt.clone(), draft.answer.clone())?;
        self.add_question(question, draft.category_id, draft.difficulty);
        Ok(id)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), ProviderError> {
        let mut guard = self.bank.lock().unwrap_or_else(|e| e.into_inner());
        let before = guard.len();
        guard.retain(|entry| entry.question.id() != id);
        if guard.len() == before {
            return Err(ProviderError::Unavailable(format!(
                "question {id} not found"
            )));
        }
        Ok(())
    }
}
