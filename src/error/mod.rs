use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Failed to load catalog: {0}")]
    CatalogLoad(String),

    #[error("Row {id} is outside the catalog (0..{rows})")]
    RowOutOfRange { id: i64, rows: usize },

    #[error("Search match carries no integer `id` in its metadata")]
    MissingRecordId,

    #[error("Search backend unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::EmptyQuery => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
            }),
            ApiError::IndexUnavailable(_) => {
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    error: "Recommendations are temporarily unavailable. Please try again."
                        .to_string(),
                })
            }
            _ => HttpResponse::InternalServerError().json(ErrorResponse {
                error: self.to_string(),
            }),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{:#}", err))
    }
}
