use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizAttempt},
        dto::{
            request::SubmitAttemptRequest,
            response::{QuestionStat, QuizAnalytics},
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
};

pub struct QuizAttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self { quizzes, attempts }
    }

    async fn require_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// Records a scored attempt. Scores are computed by the client and
    /// stored as submitted.
    pub async fn submit_attempt(
        &self,
        quiz_id: &str,
        request: SubmitAttemptRequest,
    ) -> AppResult<QuizAttempt> {
        request.validate()?;
        if request.score > request.total_questions as f64 {
            return Err(AppError::ValidationError(
                "score: Score cannot exceed total_questions".to_string(),
            ));
        }

        self.require_quiz(quiz_id).await?;

        let attempt = QuizAttempt::new(
            quiz_id,
            request.score,
            request.total_questions,
            request.selected_options,
        );
        let attempt = self.attempts.create(attempt).await?;
        log::info!("Recorded attempt {} for quiz {}", attempt.id, quiz_id);
        Ok(attempt)
    }

    pub async fn quiz_analytics(&self, quiz_id: &str) -> AppResult<QuizAnalytics> {
        let quiz = self.require_quiz(quiz_id).await?;
        let attempts = self.attempts.find_by_quiz(quiz_id).await?;
        Ok(compute_analytics(&quiz, &attempts))
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average score and per-question pass rate (percent of attempts whose
/// trimmed selection equals the trimmed correct answer), both rounded to
/// one decimal. No attempts means no per-question stats.
pub fn compute_analytics(quiz: &Quiz, attempts: &[QuizAttempt]) -> QuizAnalytics {
    let total_attempts = attempts.len();

    let (average_score, question_stats) = if total_attempts == 0 {
        (0.0, Vec::new())
    } else {
        let total_score: f64 = attempts.iter().map(|a| a.score).sum();
        let average = total_score / total_attempts as f64;

        let stats = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                let correct = question.correct_answer.trim();
                let correct_count = attempts
                    .iter()
                    .filter_map(|a| a.selection_for(idx))
                    .filter(|selected| !selected.is_empty() && selected.trim() == correct)
                    .count();

                QuestionStat {
                    question: question.question.clone(),
                    pass_rate: round_one_decimal(
                        correct_count as f64 / total_attempts as f64 * 100.0,
                    ),
                    correct_answer: question.correct_answer.clone(),
                }
            })
            .collect();

        (round_one_decimal(average), stats)
    };

    QuizAnalytics {
        quiz_id: quiz.id.clone(),
        title: quiz.title.clone(),
        total_attempts: total_attempts as u32,
        average_score,
        question_stats,
    }
}
