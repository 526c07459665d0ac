use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{QuizGenerationRequest, SaveQuizRequest, SubmitAttemptRequest},
        response::{GenerateQuizResponse, QuizListResponse, SubmitAttemptResponse},
    },
};

#[post("/api/quizzes/generate")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<QuizGenerationRequest>,
) -> Result<HttpResponse, AppError> {
    let questions = state
        .generation_service
        .generate(&request.into_inner())
        .await?
        .into_result()?;

    Ok(HttpResponse::Ok().json(GenerateQuizResponse { questions }))
}

#[post("/api/quizzes")]
pub async fn save_quiz(
    state: web::Data<AppState>,
    request: web::Json<SaveQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.save_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/quizzes")]
pub async fn list_quizzes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_quizzes().await?;
    let total_quizzes = quizzes.len();
    Ok(HttpResponse::Ok().json(QuizListResponse {
        quizzes,
        total_quizzes,
    }))
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/quizzes/{id}/attempts")]
pub async fn submit_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .quiz_attempt_service
        .submit_attempt(&id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(SubmitAttemptResponse {
        message: "Quiz submitted successfully".to_string(),
        attempt_id: attempt.id,
    }))
}

#[get("/api/quizzes/{id}/analytics")]
pub async fn quiz_analytics(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let analytics = state.quiz_attempt_service.quiz_analytics(&id).await?;
    Ok(HttpResponse::Ok().json(analytics))
}
