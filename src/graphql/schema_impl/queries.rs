use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::{
    app_state::AppState,
    models::{domain::Quiz, dto::response::QuizAnalytics},
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn quiz(&self, ctx: &Context<'_>, id: ID) -> Result<Quiz> {
        let state = ctx.data::<AppState>()?;
        state.quiz_service.get_quiz(&id).await.map_err(|e| e.extend())
    }

    /// Every saved quiz, newest first.
    async fn quizzes(&self, ctx: &Context<'_>) -> Result<Vec<Quiz>> {
        let state = ctx.data::<AppState>()?;
        state.quiz_service.list_quizzes().await.map_err(|e| e.extend())
    }

    async fn quiz_analytics(&self, ctx: &Context<'_>, quiz_id: ID) -> Result<QuizAnalytics> {
        let state = ctx.data::<AppState>()?;
        state
            .quiz_attempt_service
            .quiz_analytics(&quiz_id)
            .await
            .map_err(|e| e.extend())
    }
}
