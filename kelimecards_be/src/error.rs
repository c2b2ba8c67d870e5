use crate::{lookup::LookupError, storage::SettingsError};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the JSON API. Upstream and storage failures are logged
/// with their cause and answered with a generic message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("translation lookup failed: {0}")]
    Upstream(#[from] LookupError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Conflict(msg) | ApiError::NotFound(msg) => {
                msg.clone()
            }
            ApiError::Upstream(_) => "Failed to search for the word".to_string(),
            ApiError::Database(_) | ApiError::Settings(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Database(_) | ApiError::Settings(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: &self.public_message(),
        })
    }
}
