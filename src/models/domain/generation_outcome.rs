use crate::{errors::AppError, models::domain::question_item::QuestionItem};

/// Why a generation request produced no questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationFailure {
    /// Retrieval found too little text for the topic in the document.
    NoContext,
    /// Every attempt against the text generator failed.
    GenerationExhausted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(Vec<QuestionItem>),
    Failure(GenerationFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<Vec<QuestionItem>, AppError> {
        match self {
            GenerationOutcome::Success(questions) => Ok(questions),
            GenerationOutcome::Failure(failure) => Err(failure.into()),
        }
    }
}

impl From<GenerationFailure> for AppError {
    fn from(failure: GenerationFailure) -> Self {
        match failure {
            GenerationFailure::NoContext => AppError::NoContext,
            GenerationFailure::GenerationExhausted => AppError::GenerationExhausted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_map_to_distinct_errors() {
        assert!(matches!(
            GenerationOutcome::Failure(GenerationFailure::NoContext).into_result(),
            Err(AppError::NoContext)
        ));
        assert!(matches!(
            GenerationOutcome::Failure(GenerationFailure::GenerationExhausted).into_result(),
            Err(AppError::GenerationExhausted)
        ));
    }

    #[test]
    fn success_yields_questions() {
        let outcome = GenerationOutcome::Success(vec![]);
        assert!(outcome.is_success());
        assert_eq!(outcome.into_result().map(|q| q.len()).ok(), Some(0));
    }
}
