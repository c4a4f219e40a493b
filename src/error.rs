use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

pub const INVALID_STATUS_MESSAGE: &str = "Invalid status value. Must be one of: 0 (Pending), 1 (Manager Approved), 2 (HR Approved), 3 (Denied)";

/// Errors surfaced by the leave workflow, its stores and the HTTP layer.
#[derive(Debug, Display)]
pub enum AppError {
    /// Missing or malformed required field
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", INVALID_STATUS_MESSAGE)]
    InvalidStatus(String),

    /// Raised by the ledger when (employeeNumber, leave_date) is already taken
    #[display(fmt = "A leave request already exists for this date")]
    DuplicateRequest,

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "{}", _0)]
    Forbidden(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "Store error: {}", _0)]
    Store(anyhow::Error),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Store(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Store(e.into())
    }
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidStatus(_)
            | AppError::DuplicateRequest
            | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Body extraction failures answer with the same `{"error"}` shape as handlers.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid request body: {err}")).into()
}
