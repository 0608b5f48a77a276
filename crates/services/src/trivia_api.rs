use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use trivia_core::model::{Category, CategoryChoice, CategoryId, Question, QuestionId};

use crate::error::ProviderError;
use crate::provider::{
    QuestionDraft, QuestionListItem, QuestionPage, QuestionProvider,
};

#[derive(Clone, Debug)]
pub struct TriviaApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl TriviaApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000/api/v1.0";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("TRIVIA_API_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.into());
        let timeout_secs = env::var("TRIVIA_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for TriviaApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// `QuestionProvider` backed by the trivia REST API.
#[derive(Clone)]
pub struct TriviaApi {
    client: Client,
    base_url: String,
}

impl TriviaApi {
    /// Build a client with the configured base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` when the underlying client cannot be
    /// constructed.
    pub fn new(config: &TriviaApiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from `TRIVIA_API_URL` / `TRIVIA_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` when the underlying client cannot be
    /// constructed.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(&TriviaApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_connect() {
        ProviderError::Unavailable(err.to_string())
    } else {
        ProviderError::Http(err)
    }
}

#[async_trait]
impl QuestionProvider for TriviaApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError> {
        let response = self
            .client
            .get(self.url("categories"))
            .send()
            .await
            .map_err(transport_error)?;
        let body: CategoriesResponse = Self::decode(response).await?;

        body.categories
            .into_iter()
            .map(CategoryDto::into_category)
            .collect()
    }

    async fn next_question(
        &self,
        asked: &[QuestionId],
        category: Option<&CategoryChoice>,
    ) -> Result<Option<Question>, ProviderError> {
        let payload = QuizRequest {
            previous_questions: asked.iter().map(QuestionId::value).collect(),
            quiz_category: QuizCategoryDto::from_choice(category),
        };
        let response = self
            .client
            .post(self.url("quizzes"))
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let body: QuizResponse = Self::decode(response).await?;

        body.question.map(QuestionDto::into_question).transpose()
    }

    async fn list_questions(&self, page: u32) -> Result<QuestionPage, ProviderError> {
        let response = self
            .client
            .get(self.url("questions"))
            .query(&[("page", page)])
            .send()
            .await
            .map_err(transport_error)?;
        // The server 404s an out-of-range (or entirely empty) page.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(QuestionPage::empty());
        }
        let body: QuestionsResponse = Self::decode(response).await?;
        Ok(body.into_page())
    }

    async fn search_questions(&self, term: &str) -> Result<QuestionPage, ProviderError> {
        let payload = SearchRequest {
            search_term: term.to_string(),
        };
        let response = self
            .client
            .post(self.url("questions"))
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        // No matches comes back as a 404 rather than an empty list.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(QuestionPage::empty());
        }
        let body: QuestionsResponse = Self::decode(response).await?;
        Ok(body.into_page())
    }

    async fn questions_in_category(
        &self,
        category: CategoryId,
        page: u32,
    ) -> Result<QuestionPage, ProviderError> {
        let response = self
            .client
            .get(self.url(&format!("categories/{category}/questions")))
            .query(&[("page", page)])
            .send()
            .await
            .map_err(transport_error)?;
        // Missing categories, empty ones, and out-of-range pages all 404.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(QuestionPage::empty());
        }
        let body: QuestionsResponse = Self::decode(response).await?;
        Ok(body.into_page())
    }

    async fn create_question(&self, draft: &QuestionDraft) -> Result<QuestionId, ProviderError> {
        let payload = CreateQuestionRequest {
            question: draft.prompt.clone(),
            answer: draft.answer.clone(),
            category: draft.category_id.value(),
            difficulty: draft.difficulty,
        };
        let response = self
            .client
            .post(self.url("questions"))
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let body: CreateQuestionResponse = Self::decode(response).await?;
        Ok(QuestionId::new(body.question.id))
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), ProviderError> {
        let response = self
            .client
            .delete(self.url(&format!("questions/{id}")))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<CategoryDto>,
}

#[derive(Debug, Deserialize)]
struct CategoryDto {
    id: u64,
    #[serde(rename = "type")]
    label: String,
}

impl CategoryDto {
    fn into_category(self) -> Result<Category, ProviderError> {
        Ok(Category::new(CategoryId::new(self.id), self.label)?)
    }
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    question: String,
    answer: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<u32>,
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, ProviderError> {
        Ok(Question::new(
            QuestionId::new(self.id),
            self.question,
            self.answer,
        )?)
    }

    fn into_list_item(self) -> QuestionListItem {
        QuestionListItem {
            id: QuestionId::new(self.id),
            prompt: self.question,
            answer: self.answer,
            category_label: self.category,
            difficulty: self.difficulty.unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
struct QuizRequest {
    previous_questions: Vec<u64>,
    quiz_category: QuizCategoryDto,
}

#[derive(Debug, Serialize)]
struct QuizCategoryDto {
    #[serde(rename = "type")]
    label: String,
    id: u64,
}

impl QuizCategoryDto {
    /// Missing and "all" choices both go out with the reserved id 0, which
    /// the server reads as "no category filter".
    fn from_choice(choice: Option<&CategoryChoice>) -> Self {
        match choice {
            Some(choice) => Self {
                label: choice.label().to_string(),
                id: choice.id().value(),
            },
            None => Self {
                label: "ALL".to_string(),
                id: 0,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuizResponse {
    question: Option<QuestionDto>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    questions: Vec<QuestionDto>,
    total_questions: u64,
}

impl QuestionsResponse {
    fn into_page(self) -> QuestionPage {
        QuestionPage {
            questions: self
                .questions
                .into_iter()
                .map(QuestionDto::into_list_item)
                .collect(),
            total: self.total_questions,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateQuestionRequest {
    question: String,
    answer: String,
    category: u64,
    difficulty: u32,
}

#[derive(Debug, Deserialize)]
struct CreateQuestionResponse {
    question: CreatedQuestionDto,
}

#[derive(Debug, Deserialize)]
struct CreatedQuestionDto {
    id: u64,
}

#[derive(Debug, Serialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: String,
}
