use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::mail::MailError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Incorrect credentials")]
    InvalidCredentials,

    #[error("Could not send the activation email")]
    Delivery(#[source] MailError),

    #[error("Internal server error")]
    Database(sqlx::Error),

    #[error("Internal server error")]
    Storage(#[from] std::io::Error),

    #[error("Internal server error")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // A lost race on a UNIQUE column reads the same as the pre-check.
        let unique = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            AppError::Conflict("Email, matricule or pseudo already in use".into())
        } else {
            AppError::Database(err)
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Delivery(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Delivery(_)
            | AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            AppError::Delivery(source) => tracing::error!("mail delivery failed: {source}"),
            AppError::Database(source) => tracing::error!("database error: {source:?}"),
            AppError::Storage(source) => tracing::error!("archive storage error: {source}"),
            AppError::Hash(source) => tracing::error!("password hashing error: {source}"),
            _ => {}
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
