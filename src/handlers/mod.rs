pub mod document_handler;
pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

pub use document_handler::{delete_document, upload_document};
pub use health_handler::{health_check, health_check_ready};
pub use quiz_handler::{
    delete_quiz, generate_quiz, get_quiz, list_quizzes, quiz_analytics, save_quiz,
    submit_attempt,
};

/// Registers every REST route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(upload_document)
        .service(delete_document)
        .service(generate_quiz)
        .service(save_quiz)
        .service(list_quizzes)
        .service(get_quiz)
        .service(delete_quiz)
        .service(submit_attempt)
        .service(quiz_analytics);
}
