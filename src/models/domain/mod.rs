pub mod document_chunk;
pub mod generation_outcome;
pub mod question_item;
pub mod quiz;
pub mod quiz_attempt;
pub use document_chunk::{ChunkMetadata, DocumentChunk, Embedding, IndexedChunk};
pub use generation_outcome::{GenerationFailure, GenerationOutcome};
pub use question_item::QuestionItem;
pub use quiz::Quiz;
pub use quiz_attempt::QuizAttempt;
