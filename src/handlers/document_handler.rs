use actix_web::{delete, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::UploadDocumentParams,
        response::{DeleteDocumentResponse, UploadDocumentResponse},
    },
    services::ingestion_service::extract_pdf_text,
};

fn is_pdf_filename(filename: &str) -> bool {
    filename.trim().to_lowercase().ends_with(".pdf")
}

/// Raw PDF body; the original file name travels in `?filename=`.
#[post("/api/documents")]
pub async fn upload_document(
    state: web::Data<AppState>,
    params: web::Query<UploadDocumentParams>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let filename = params.into_inner().filename;
    if !is_pdf_filename(&filename) {
        return Err(AppError::BadRequest(
            "Only PDF files are allowed".to_string(),
        ));
    }

    let text = extract_pdf_text(body.to_vec()).await?;
    let document_id = Uuid::new_v4().to_string();
    let chunk_count = state.ingestion_service.ingest(&document_id, &text).await?;

    let message = if chunk_count == 0 {
        "No extractable text found in the document".to_string()
    } else {
        "File processed successfully".to_string()
    };

    Ok(HttpResponse::Created().json(UploadDocumentResponse {
        document_id,
        filename,
        characters: text.chars().count(),
        chunk_count,
        message,
    }))
}

#[delete("/api/documents/{document_id}")]
pub async fn delete_document(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document_id = document_id.into_inner();
    let chunks_removed = state.ingestion_service.delete(&document_id).await?;

    Ok(HttpResponse::Ok().json(DeleteDocumentResponse {
        document_id,
        chunks_removed,
    }))
}
