use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub score: f64,
    pub total_questions: u32,
    /// Question index (as a string key) to the option text the user picked.
    pub selected_options: HashMap<String, String>,
    pub submitted_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn new(
        quiz_id: &str,
        score: f64,
        total_questions: u32,
        selected_options: HashMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            score,
            total_questions,
            selected_options,
            submitted_at: Utc::now(),
        }
    }

    pub fn selection_for(&self, question_index: usize) -> Option<&str> {
        self.selected_options
            .get(&question_index.to_string())
            .map(String::as_str)
    }
}
