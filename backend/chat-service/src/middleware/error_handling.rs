use crate::error::AppError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use error_types::{error_codes, ErrorResponse};
use tracing::error;

/// Map domain errors to the shared HTTP error envelope.
pub fn map_error(err: &AppError) -> (StatusCode, ErrorResponse) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (error_type, code) = match err {
        AppError::Validation(_) => ("validation_error", error_codes::INVALID_REQUEST),
        AppError::Unauthorized => ("authentication_error", error_codes::UNAUTHORIZED),
        AppError::Forbidden(_) => ("authorization_error", error_codes::AUTHORIZATION_ERROR),
        AppError::NotFound(resource) => (
            "not_found_error",
            match *resource {
                "conversation" => error_codes::CONVERSATION_NOT_FOUND,
                "notification" => error_codes::NOTIFICATION_NOT_FOUND,
                _ => error_codes::MESSAGE_NOT_FOUND,
            },
        ),
        AppError::Database(sqlx::Error::RowNotFound) => {
            ("not_found_error", error_codes::MESSAGE_NOT_FOUND)
        }
        AppError::Database(_) => ("server_error", error_codes::DATABASE_ERROR),
        AppError::Config(_)
        | AppError::StartServer(_)
        | AppError::UpstreamAsset(_)
        | AppError::Internal => ("server_error", error_codes::INTERNAL_SERVER_ERROR),
    };

    // Opaque 500s keep their context in the log, not in the response.
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "request failed");
    }

    let message = match err {
        AppError::Database(sqlx::Error::RowNotFound) => "not found".to_string(),
        AppError::Database(_) | AppError::Internal => "internal server error".to_string(),
        other => other.to_string(),
    };

    let response = ErrorResponse::new(
        match status {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::NOT_FOUND => "Not Found",
            _ => "Internal Server Error",
        },
        &message,
        status.as_u16(),
        error_type,
        code,
    );

    (status, response)
}

pub fn into_response(err: AppError) -> impl IntoResponse {
    let (status, response) = map_error(&err);
    (status, Json(response))
}
