use std::sync::Arc;

use crate::{
    config::{Config, EmbeddingProvider, VectorIndexBackend},
    db::Database,
    errors::AppResult,
    repositories::{
        InMemoryVectorIndex, MongoQuizAttemptRepository, MongoQuizRepository, MongoVectorIndex,
        QuizAttemptRepository, QuizRepository, VectorIndex,
    },
    services::{
        chunker::{Chunker, ChunkerConfig},
        embedding_service::{Embedder, HashingEmbedder, OpenAiEmbedder},
        llm_service::{OpenAiTextGenerator, TextGenerator},
        prompt_builder::PromptBuilder,
        retriever::Retriever,
        IngestionService, QuizAttemptService, QuizGenerationService, QuizService, RetryPolicy,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub database: Option<Database>,
    pub ingestion_service: Arc<IngestionService>,
    pub generation_service: Arc<QuizGenerationService>,
    pub quiz_service: Arc<QuizService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
}

impl AppState {
    /// Connects to MongoDB, ensures indexes and opens the one vector index
    /// handle every request shares.
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let embedder: Arc<dyn Embedder> = match config.embedding_provider {
            EmbeddingProvider::Hashing => Arc::new(HashingEmbedder::default()),
            EmbeddingProvider::OpenAi => Arc::new(OpenAiEmbedder::new(
                &config.embedding_api_base,
                config.embedding_api_key.clone(),
                &config.embedding_model,
            )),
        };

        let vector_index: Arc<dyn VectorIndex> = match config.vector_index_backend {
            VectorIndexBackend::Mongo => {
                let index = MongoVectorIndex::new(&db, embedder);
                index.ensure_indexes().await?;
                Arc::new(index)
            }
            VectorIndexBackend::Memory => {
                log::warn!("Using in-memory vector index; ingested documents are lost on restart");
                Arc::new(InMemoryVectorIndex::new(embedder))
            }
        };

        let quiz_repository = MongoQuizRepository::new(&db);
        quiz_repository.ensure_indexes().await?;
        let attempt_repository = MongoQuizAttemptRepository::new(&db);
        attempt_repository.ensure_indexes().await?;

        let generator = Arc::new(OpenAiTextGenerator::new(
            &config.llm_api_base,
            &config.llm_api_key,
            &config.llm_model,
            config.llm_temperature,
        ));

        let mut state = Self::from_parts(
            config,
            vector_index,
            generator,
            Arc::new(quiz_repository),
            Arc::new(attempt_repository),
        )?;
        state.database = Some(db);
        Ok(state)
    }

    /// Wires the services over already-built collaborators.
    pub fn from_parts(
        config: Config,
        vector_index: Arc<dyn VectorIndex>,
        generator: Arc<dyn TextGenerator>,
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> AppResult<Self> {
        let chunker = Chunker::new(ChunkerConfig {
            max_chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
        })?;
        let ingestion_service = Arc::new(IngestionService::new(chunker, vector_index.clone()));

        let generation_service = Arc::new(QuizGenerationService::new(
            Retriever::new(
                vector_index,
                config.retrieval_top_k,
                config.min_context_chars,
            ),
            PromptBuilder::new(config.prompt_context_chars),
            generator,
            RetryPolicy::from_config(&config),
        ));

        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            attempt_repository.clone(),
        ));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
        ));

        Ok(Self {
            config: Arc::new(config),
            database: None,
            ingestion_service,
            generation_service,
            quiz_service,
            quiz_attempt_service,
        })
    }
}
