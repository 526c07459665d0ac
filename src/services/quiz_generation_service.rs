use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    config::Config,
    errors::AppResult,
    models::{
        domain::{GenerationFailure, GenerationOutcome, QuestionItem},
        dto::request::QuizGenerationRequest,
    },
    services::{
        json_repair::{normalize_questions, repair_json, JsonRepairError},
        llm_service::TextGenerator,
        prompt_builder::PromptBuilder,
        retriever::Retriever,
    },
};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Why a single generation attempt produced nothing usable. Always
/// retried; never surfaced to callers.
#[derive(Debug, Error)]
pub enum GenerationFault {
    #[error("generator call failed: {0}")]
    CallFailed(String),
    #[error("generator call timed out after {0:?}")]
    TimedOut(Duration),
    #[error("generator returned an empty response")]
    EmptyResponse,
    #[error("response is not recoverable JSON: {0}")]
    Unparseable(#[from] JsonRepairError),
    #[error("response contained no usable questions")]
    NoQuestions,
}

impl GenerationFault {
    /// Call failures and garbage output wait before the next attempt;
    /// empty results retry straight away.
    fn backs_off(&self) -> bool {
        matches!(
            self,
            GenerationFault::CallFailed(_)
                | GenerationFault::TimedOut(_)
                | GenerationFault::Unparseable(_)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.generation_max_attempts.max(1),
            retry_backoff: config.generation_retry_backoff,
            attempt_timeout: config.generation_attempt_timeout,
        }
    }
}

/// Drives retrieval, prompting and bounded generator retries for one
/// request at a time. Attempts run strictly in sequence and stop at the
/// first usable response.
pub struct QuizGenerationService {
    retriever: Retriever,
    prompt_builder: PromptBuilder,
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl QuizGenerationService {
    pub fn new(
        retriever: Retriever,
        prompt_builder: PromptBuilder,
        generator: Arc<dyn TextGenerator>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            retriever,
            prompt_builder,
            generator,
            policy,
        }
    }

    /// `Err` only for an invalid request or an unreachable index; every
    /// generator problem is absorbed into the outcome.
    pub async fn generate(&self, request: &QuizGenerationRequest) -> AppResult<GenerationOutcome> {
        request.validate_request()?;

        let context = self
            .retriever
            .retrieve_default(&request.topic, &request.document_id)
            .await?;

        if !self.retriever.is_sufficient(&context) {
            log::info!(
                "Insufficient context ({} chars) for topic '{}' in document {}",
                context.chars().count(),
                request.topic,
                request.document_id
            );
            return Ok(GenerationOutcome::Failure(GenerationFailure::NoContext));
        }

        let prompt = self.prompt_builder.build(
            &request.topic,
            &request.difficulty,
            request.count,
            &context,
        );

        let max_attempts = self.policy.max_attempts;
        for attempt in 1..=max_attempts {
            log::info!(
                "Generation attempt {}/{} for document {}",
                attempt,
                max_attempts,
                request.document_id
            );

            match self.run_attempt(&prompt, request.count).await {
                Ok(questions) => {
                    log::info!(
                        "Generated {} questions on attempt {}/{}",
                        questions.len(),
                        attempt,
                        max_attempts
                    );
                    return Ok(GenerationOutcome::Success(questions));
                }
                Err(fault) => {
                    log::warn!(
                        "Generation attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        fault
                    );
                    if fault.backs_off() && attempt < max_attempts {
                        tokio::time::sleep(self.policy.retry_backoff).await;
                    }
                }
            }
        }

        log::error!(
            "Quiz generation exhausted {} attempts for document {}",
            max_attempts,
            request.document_id
        );
        Ok(GenerationOutcome::Failure(
            GenerationFailure::GenerationExhausted,
        ))
    }

    async fn run_attempt(
        &self,
        prompt: &str,
        count: u32,
    ) -> Result<Vec<QuestionItem>, GenerationFault> {
        let content = match tokio::time::timeout(
            self.policy.attempt_timeout,
            self.generator.generate(prompt),
        )
        .await
        {
            Err(_) => return Err(GenerationFault::TimedOut(self.policy.attempt_timeout)),
            Ok(Err(e)) => return Err(GenerationFault::CallFailed(e.to_string())),
            Ok(Ok(content)) => content,
        };

        parse_questions(&content, count)
    }
}

/// Repairs, normalizes and validates raw generator output. Items that do
/// not have the question shape are dropped; at most `count` are kept.
pub fn parse_questions(content: &str, count: u32) -> Result<Vec<QuestionItem>, GenerationFault> {
    if content.trim().is_empty() {
        return Err(GenerationFault::EmptyResponse);
    }

    let value = repair_json(content)?;

    let questions: Vec<QuestionItem> = normalize_questions(value)
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<QuestionItem>(item) {
            Ok(question) => match question.validate_shape() {
                Ok(()) => Some(question),
                Err(reason) => {
                    log::warn!("Dropping malformed question: {}", reason);
                    None
                }
            },
            Err(e) => {
                log::warn!("Dropping item that is not a question: {}", e);
                None
            }
        })
        .take(count as usize)
        .collect();

    if questions.is_empty() {
        return Err(GenerationFault::NoQuestions);
    }
    Ok(questions)
}
