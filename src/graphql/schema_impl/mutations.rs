use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    app_state::AppState,
    models::{domain::QuestionItem, dto::request::QuizGenerationRequest},
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Generates questions grounded in one uploaded document. Nothing is
    /// saved.
    async fn generate_quiz(
        &self,
        ctx: &Context<'_>,
        input: QuizGenerationRequest,
    ) -> Result<Vec<QuestionItem>> {
        let state = ctx.data::<AppState>()?;

        state
            .generation_service
            .generate(&input)
            .await
            .and_then(|outcome| outcome.into_result())
            .map_err(|e| e.extend())
    }
}
