use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::{QuestionItem, Quiz};

#[derive(Debug, Serialize)]
pub struct GenerateQuizResponse {
    pub questions: Vec<QuestionItem>,
}

#[derive(Debug, Serialize)]
pub struct UploadDocumentResponse {
    pub document_id: String,
    pub filename: String,
    pub characters: usize,
    pub chunk_count: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteDocumentResponse {
    pub document_id: String,
    pub chunks_removed: u64,
}

#[derive(Debug, Serialize)]
pub struct QuizListResponse {
    pub quizzes: Vec<Quiz>,
    pub total_quizzes: usize,
}

#[derive(Debug, Serialize)]
pub struct SubmitAttemptResponse {
    pub message: String,
    pub attempt_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct QuestionStat {
    pub question: String,
    pub pass_rate: f64,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct QuizAnalytics {
    pub quiz_id: String,
    pub title: String,
    pub total_attempts: u32,
    pub average_score: f64,
    pub question_stats: Vec<QuestionStat>,
}
