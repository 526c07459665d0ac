use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question_item::QuestionItem;

pub const DEFAULT_QUIZ_TITLE: &str = "Untitled Quiz";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub topic: Option<String>,
    pub document_id: Option<String>, // source document the questions were grounded in
    pub questions: Vec<QuestionItem>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(
        title: Option<String>,
        topic: Option<String>,
        document_id: Option<String>,
        questions: Vec<QuestionItem>,
    ) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_QUIZ_TITLE.to_string());

        Quiz {
            id: Uuid::new_v4().to_string(),
            title,
            topic,
            document_id,
            questions,
            created_at: Utc::now(),
        }
    }
}
