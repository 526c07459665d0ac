use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Quiz, dto::request::SaveQuizRequest},
    repositories::{QuizAttemptRepository, QuizRepository},
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            repository,
            attempts,
        }
    }

    pub async fn save_quiz(&self, request: SaveQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        for (idx, question) in request.questions.iter().enumerate() {
            question
                .validate_shape()
                .map_err(|reason| AppError::BadRequest(format!("Question {}: {}", idx + 1, reason)))?;
        }

        let quiz = Quiz::new(
            request.title,
            request.topic,
            request.document_id,
            request.questions,
        );
        let quiz = self.repository.create(quiz).await?;
        log::info!("Saved quiz {} with {} questions", quiz.id, quiz.questions.len());
        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn list_quizzes(&self) -> AppResult<Vec<Quiz>> {
        self.repository.list_all().await
    }

    /// Removes the quiz together with every attempt recorded against it.
    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        let removed_attempts = self.attempts.delete_by_quiz(id).await?;

        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }

        log::info!("Deleted quiz {} and {} attempts", id, removed_attempts);
        Ok(())
    }
}
