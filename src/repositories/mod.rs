pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod vector_index_repository;

pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use vector_index_repository::{InMemoryVectorIndex, MongoVectorIndex, VectorIndex};
