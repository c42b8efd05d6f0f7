//! Unified API error envelope shared by Ripple backend services.
//!
//! Every service maps its domain errors into [`ErrorResponse`] before they
//! cross the HTTP boundary, so clients see one shape regardless of which
//! service produced the failure.

use serde::{Deserialize, Serialize};

/// Stable error codes used for client-side routing and localization.
///
/// Format: `SCREAMING_SNAKE`, scoped by resource where it matters
/// (e.g. `MESSAGE_NOT_FOUND` vs a bare `NOT_FOUND`).
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const AUTHORIZATION_ERROR: &str = "AUTHORIZATION_ERROR";
    pub const CONVERSATION_NOT_FOUND: &str = "CONVERSATION_NOT_FOUND";
    pub const MESSAGE_NOT_FOUND: &str = "MESSAGE_NOT_FOUND";
    pub const NOTIFICATION_NOT_FOUND: &str = "NOTIFICATION_NOT_FOUND";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

/// Unified API error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error title ("Not Found", "Bad Request", ...).
    pub error: String,

    /// Human-readable message describing this particular failure.
    pub message: String,

    /// HTTP status code.
    pub status: u16,

    /// Error class for client routing: "validation_error",
    /// "authentication_error", "authorization_error", "not_found_error",
    /// "server_error".
    pub error_type: String,

    /// Stable code from [`error_codes`].
    pub code: String,

    /// ISO 8601 timestamp.
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
