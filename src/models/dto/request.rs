use std::collections::HashMap;

use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::{errors::AppError, models::domain::QuestionItem};

pub const MAX_QUESTION_COUNT: u32 = 50;

fn default_difficulty() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct QuizGenerationRequest {
    #[validate(length(min = 1, max = 200, message = "Topic must be 1-200 characters"))]
    pub topic: String,

    // easy | medium | hard, or any free-form level the caller wants
    #[serde(default = "default_difficulty")]
    #[graphql(default_with = "default_difficulty()")]
    #[validate(length(min = 1, max = 32))]
    pub difficulty: String,

    // upper bound enforced in `validate_request` against MAX_QUESTION_COUNT
    #[validate(range(min = 1, message = "Count must be at least 1"))]
    pub count: u32,

    #[validate(length(min = 1, message = "document_id is required"))]
    pub document_id: String,
}

impl QuizGenerationRequest {
    pub fn new(topic: &str, difficulty: &str, count: u32, document_id: &str) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            count,
            document_id: document_id.to_string(),
        }
    }

    /// `validator` accepts whitespace as content; the pipeline does not.
    pub fn validate_request(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.count > MAX_QUESTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "count: Count must be between 1 and {}",
                MAX_QUESTION_COUNT
            )));
        }
        if self.topic.trim().is_empty() {
            return Err(AppError::ValidationError(
                "topic: Topic must not be blank".to_string(),
            ));
        }
        if self.document_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "document_id: document_id must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveQuizRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub topic: Option<String>,
    pub document_id: Option<String>,
    #[validate(length(min = 1, message = "A quiz needs at least one question"))]
    pub questions: Vec<QuestionItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(range(min = 0.0))]
    pub score: f64,
    #[validate(range(min = 1))]
    pub total_questions: u32,
    #[serde(default)]
    pub selected_options: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadDocumentParams {
    pub filename: String,
}
