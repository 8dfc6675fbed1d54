use crate::domain::CleanupResponse;
use crate::repository;
use crate::{build_error_response, error_chain_fmt};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum CleanupError {
    // TracingLogger records the Debug cause chain on the request span; the client only
    // ever sees the Display message.
    #[error("Failed to remove duplicates")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CleanupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CleanupError {
    fn status_code(&self) -> StatusCode {
        match self {
            CleanupError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        build_error_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(name = "Removing duplicate rows", skip_all)]
pub async fn remove_all_duplicates(pool: web::Data<PgPool>) -> Result<HttpResponse, CleanupError> {
    let report = repository::remove_all_duplicates(&pool).await?;

    Ok(HttpResponse::Ok().json(CleanupResponse::from(report)))
}
