use std::{env, str::FromStr, time::Duration};

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingProvider {
    Hashing,
    OpenAi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorIndexBackend {
    Mongo,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub max_upload_bytes: usize,

    pub llm_api_base: String,
    pub llm_api_key: SecretString,
    pub llm_model: String,
    pub llm_temperature: f32,

    pub embedding_provider: EmbeddingProvider,
    pub embedding_api_base: String,
    pub embedding_api_key: SecretString,
    pub embedding_model: String,
    pub vector_index_backend: VectorIndexBackend,

    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_top_k: usize,
    pub min_context_chars: usize,
    pub prompt_context_chars: usize,

    pub generation_max_attempts: u32,
    pub generation_retry_backoff: Duration,
    pub generation_attempt_timeout: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let embedding_provider = match env_or("EMBEDDING_PROVIDER", "hashing")
            .to_lowercase()
            .as_str()
        {
            "openai" => EmbeddingProvider::OpenAi,
            _ => EmbeddingProvider::Hashing,
        };
        let vector_index_backend = match env_or("VECTOR_INDEX_BACKEND", "mongo")
            .to_lowercase()
            .as_str()
        {
            "memory" => VectorIndexBackend::Memory,
            _ => VectorIndexBackend::Mongo,
        };

        Self {
            mongo_conn_string: env_or("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: env_or("MONGO_DB_NAME", "quizrag-local"),
            web_server_host: env_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env_parse("WEB_SERVER_PORT", 8080),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),

            llm_api_base: env_or("LLM_API_BASE", "https://api.groq.com/openai/v1"),
            llm_api_key: SecretString::from(env_or("LLM_API_KEY", "")),
            llm_model: env_or("LLM_MODEL", "llama3-8b-8192"),
            llm_temperature: env_parse("LLM_TEMPERATURE", 0.7),

            embedding_provider,
            embedding_api_base: env_or("EMBEDDING_API_BASE", "https://api.openai.com/v1"),
            embedding_api_key: SecretString::from(env_or("EMBEDDING_API_KEY", "")),
            embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            vector_index_backend,

            chunk_size: env_parse("CHUNK_SIZE", 1000),
            chunk_overlap: env_parse("CHUNK_OVERLAP", 200),
            retrieval_top_k: env_parse("RETRIEVAL_TOP_K", 5),
            min_context_chars: env_parse("MIN_CONTEXT_CHARS", 100),
            prompt_context_chars: env_parse("PROMPT_CONTEXT_CHARS", 3000),

            generation_max_attempts: env_parse("GENERATION_MAX_ATTEMPTS", 3),
            generation_retry_backoff: Duration::from_millis(env_parse(
                "GENERATION_RETRY_BACKOFF_MS",
                1000,
            )),
            generation_attempt_timeout: Duration::from_secs(env_parse(
                "GENERATION_ATTEMPT_TIMEOUT_SECS",
                60,
            )),
        }
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        if self.chunk_size == 0 {
            return Err(AppError::ValidationError(
                "CHUNK_SIZE must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::ValidationError(format!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.retrieval_top_k == 0 {
            return Err(AppError::ValidationError(
                "RETRIEVAL_TOP_K must be at least 1".to_string(),
            ));
        }
        if self.generation_max_attempts == 0 {
            return Err(AppError::ValidationError(
                "GENERATION_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if self.llm_model.trim().is_empty() {
            return Err(AppError::ValidationError(
                "LLM_MODEL must not be empty".to_string(),
            ));
        }
        if self.llm_api_key.expose_secret().is_empty() {
            log::warn!("LLM_API_KEY is not set; generation requests will fail");
        }
        if self.embedding_provider == EmbeddingProvider::OpenAi
            && self.embedding_api_key.expose_secret().is_empty()
        {
            return Err(AppError::ValidationError(
                "EMBEDDING_API_KEY is required when EMBEDDING_PROVIDER=openai".to_string(),
            ));
        }
        Ok(())
    }

    /// In-memory index, hashing embeddings and no retry backoff. Never
    /// reads the environment.
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizrag-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            max_upload_bytes: 1024 * 1024,
            llm_api_base: "http://localhost:9999/v1".to_string(),
            llm_api_key: SecretString::from("test_llm_key".to_string()),
            llm_model: "test-model".to_string(),
            llm_temperature: 0.0,
            embedding_provider: EmbeddingProvider::Hashing,
            embedding_api_base: "http://localhost:9999/v1".to_string(),
            embedding_api_key: SecretString::from(String::new()),
            embedding_model: "test-embedding".to_string(),
            vector_index_backend: VectorIndexBackend::Memory,
            chunk_size: 1000,
            chunk_overlap: 200,
            retrieval_top_k: 5,
            min_context_chars: 100,
            prompt_context_chars: 3000,
            generation_max_attempts: 3,
            generation_retry_backoff: Duration::ZERO,
            generation_attempt_timeout: Duration::from_secs(5),
        }
    }
}
