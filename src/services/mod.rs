pub mod chunker;
pub mod embedding_service;
pub mod ingestion_service;
pub mod json_repair;
pub mod llm_service;
pub mod prompt_builder;
pub mod quiz_attempt_service;
pub mod quiz_generation_service;
pub mod quiz_service;
pub mod retriever;

pub use ingestion_service::IngestionService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_generation_service::{QuizGenerationService, RetryPolicy};
pub use quiz_service::QuizService;
