//! Shared fixtures for the integration tests.
//!
//! `ScriptedGenerator`, `questions_json` and `biology_text` mirror
//! `src/test_utils.rs`, which is `cfg(test)` and not visible from here.
//! Change both copies together.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use quizrag_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizAttempt},
    repositories::{InMemoryVectorIndex, QuizAttemptRepository, QuizRepository},
    services::{embedding_service::HashingEmbedder, llm_service::TextGenerator},
};

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate quiz id '{}'",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.remove(id).is_some())
    }
}

pub struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<Vec<QuizAttempt>>>,
}

impl InMemoryQuizAttemptRepository {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if attempts.iter().any(|a| a.id == attempt.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate attempt id '{}'",
                attempt.id
            )));
        }
        attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .iter()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(items)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|a| a.quiz_id != quiz_id);
        Ok((before - attempts.len()) as u64)
    }
}

/// Replays a fixed sequence of generator results, then empty strings.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<AppResult<String>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<AppResult<String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string()); 16])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script lock poisoned").pop_front();
        next.unwrap_or_else(|| Ok(String::new()))
    }
}

pub fn questions_json(count: usize) -> String {
    let items: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "question": format!("Question {}?", n),
                "options": ["Alpha", "Beta", "Gamma", "Delta"],
                "correct_answer": "Alpha",
                "explanation": format!("Explanation {}", n),
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

pub fn biology_text() -> String {
    "Photosynthesis takes place in the chloroplasts of plant cells. \
     Chlorophyll absorbs light energy, which drives the conversion of carbon dioxide \
     and water into glucose and oxygen. The light-dependent reactions occur in the \
     thylakoid membranes, while the Calvin cycle runs in the stroma."
        .to_string()
}

pub fn history_text() -> String {
    "The Treaty of Westphalia was signed in 1648 and ended the Thirty Years War. \
     It established the principle of state sovereignty and reshaped the political \
     map of central Europe, weakening the Holy Roman Empire for generations."
        .to_string()
}

pub struct TestApp {
    pub state: AppState,
    pub index: Arc<InMemoryVectorIndex>,
}

/// Application state over in-memory collaborators and `generator`.
pub fn test_app(generator: Arc<dyn TextGenerator>) -> TestApp {
    let index = Arc::new(InMemoryVectorIndex::new(Arc::new(HashingEmbedder::default())));
    let state = AppState::from_parts(
        Config::test_config(),
        index.clone(),
        generator,
        Arc::new(InMemoryQuizRepository::new()),
        Arc::new(InMemoryQuizAttemptRepository::new()),
    )
    .expect("test config is valid");

    TestApp { state, index }
}
