mod common;

use std::{collections::HashMap, sync::Arc};

use quizrag_server::{
    models::domain::{QuestionItem, Quiz, QuizAttempt},
    repositories::{InMemoryVectorIndex, QuizAttemptRepository, QuizRepository, VectorIndex},
    services::embedding_service::HashingEmbedder,
};

use common::{biology_text, history_text, InMemoryQuizAttemptRepository, InMemoryQuizRepository};

fn make_question() -> QuestionItem {
    QuestionItem {
        question: "Where does photosynthesis happen?".to_string(),
        options: vec![
            "Chloroplast".to_string(),
            "Nucleus".to_string(),
            "Ribosome".to_string(),
            "Vacuole".to_string(),
        ],
        correct_answer: "Chloroplast".to_string(),
        explanation: String::new(),
    }
}

fn make_quiz(id: &str, title: &str) -> Quiz {
    let mut quiz = Quiz::new(Some(title.to_string()), None, None, vec![make_question()]);
    quiz.id = id.to_string();
    quiz
}

fn make_attempt(id: &str, quiz_id: &str, score: f64) -> QuizAttempt {
    let mut attempt = QuizAttempt::new(quiz_id, score, 1, HashMap::new());
    attempt.id = id.to_string();
    attempt
}

#[tokio::test]
async fn quiz_repository_crud_and_error_paths() {
    let repo = InMemoryQuizRepository::new();

    let created = repo
        .create(make_quiz("quiz-1", "Quiz One"))
        .await
        .expect("create quiz1");
    assert_eq!(created.id, "quiz-1");
    repo.create(make_quiz("quiz-2", "Quiz Two"))
        .await
        .expect("create quiz2");

    assert!(repo.create(make_quiz("quiz-1", "Again")).await.is_err());

    let found = repo.find_by_id("quiz-1").await.expect("find should work");
    assert_eq!(found.map(|q| q.title), Some("Quiz One".to_string()));
    assert!(repo.find_by_id("missing").await.expect("find").is_none());

    assert_eq!(repo.list_all().await.expect("list").len(), 2);

    assert!(repo.delete("quiz-1").await.expect("delete should work"));
    assert!(!repo.delete("quiz-1").await.expect("second delete should work"));
    assert_eq!(repo.list_all().await.expect("list").len(), 1);
}

#[tokio::test]
async fn quiz_attempt_repository_scopes_by_quiz() {
    let repo = InMemoryQuizAttemptRepository::new();

    repo.create(make_attempt("a-1", "quiz-1", 1.0)).await.expect("create");
    repo.create(make_attempt("a-2", "quiz-1", 0.0)).await.expect("create");
    repo.create(make_attempt("a-3", "quiz-2", 1.0)).await.expect("create");
    assert!(repo.create(make_attempt("a-1", "quiz-1", 1.0)).await.is_err());

    assert_eq!(repo.find_by_quiz("quiz-1").await.expect("query").len(), 2);
    assert_eq!(repo.find_by_quiz("quiz-3").await.expect("query").len(), 0);

    assert_eq!(repo.delete_by_quiz("quiz-1").await.expect("delete"), 2);
    assert!(repo.find_by_quiz("quiz-1").await.expect("query").is_empty());
    assert_eq!(repo.find_by_quiz("quiz-2").await.expect("query").len(), 1);
}

#[tokio::test]
async fn vector_index_never_returns_other_documents() {
    let index = InMemoryVectorIndex::new(Arc::new(HashingEmbedder::default()));
    index
        .insert("bio", vec![biology_text()])
        .await
        .expect("insert bio");
    index
        .insert("hist", vec![history_text()])
        .await
        .expect("insert hist");

    // The query matches the history text best, but only biology is in scope.
    let results = index
        .query("Treaty of Westphalia sovereignty", "bio", 5)
        .await
        .expect("query");

    assert_eq!(results, vec![biology_text()]);
}

#[tokio::test]
async fn vector_index_respects_k_and_reingestion_appends() {
    let index = InMemoryVectorIndex::new(Arc::new(HashingEmbedder::default()));
    let chunks: Vec<String> = (0..8).map(|i| format!("chunk number {} about cells", i)).collect();

    index.insert("doc", chunks.clone()).await.expect("insert");
    index.insert("doc", chunks).await.expect("insert again");

    assert_eq!(index.len().await, 16);
    assert_eq!(index.query("cells", "doc", 5).await.expect("query").len(), 5);
    assert_eq!(index.query("cells", "doc", 0).await.expect("query").len(), 0);
    assert!(index.query("cells", "other", 5).await.expect("query").is_empty());

    assert_eq!(index.delete_document("doc").await.expect("delete"), 16);
    assert!(index.is_empty().await);
}
