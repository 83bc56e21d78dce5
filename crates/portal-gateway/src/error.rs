use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portal_redirector::RedirectorError;
use portal_shortener::ShortenerError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request body was not the expected JSON document.
    MalformedBody,
    Shorten(ShortenerError),
    Resolve(RedirectorError),
}

impl From<ShortenerError> for AppError {
    fn from(e: ShortenerError) -> Self {
        AppError::Shorten(e)
    }
}

impl From<RedirectorError> for AppError {
    fn from(e: RedirectorError) -> Self {
        AppError::Resolve(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Can not parse JSON"),
            ),
            AppError::Shorten(e) => match e {
                ShortenerError::InvalidUrl(_) => {
                    (StatusCode::BAD_REQUEST, ErrorResponse::new("Invalid URL"))
                }
                ShortenerError::InvalidDomain(_) => {
                    (StatusCode::BAD_REQUEST, ErrorResponse::new("Invalid domain"))
                }
                ShortenerError::AliasConflict(_) => (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new(
                        "Provided short URL already in use. Please provide some other short URL",
                    ),
                ),
                ShortenerError::QuotaExceeded { reset_in } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Rate limit exceeded",
                        rate_limit_reset_minutes: Some(reset_in.as_secs() / 60),
                    },
                ),
                ShortenerError::Storage(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Unable to connect to the server"),
                ),
            },
            AppError::Resolve(e) => match e {
                RedirectorError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Short URL not found in the database"),
                ),
                RedirectorError::Storage(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Can not connect to database"),
                ),
            },
        };

        (status, Json(body)).into_response()
    }
}
