//! Error types for Alexandria server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// A single failed field in a validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Reference conflict: {0}")]
    ReferenceConflict(String),

    #[error("Store error: {0}")]
    Store(#[from] mongodb::error::Error),
}

impl AppError {
    /// Shorthand for a single-field validation failure
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }

    /// Machine-readable error kind, stable across releases
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidReference(_) => "invalid_reference",
            AppError::Duplicate(_) => "duplicate",
            AppError::ReferenceConflict(_) => "reference_conflict",
            AppError::Store(_) => "store_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) | AppError::ReferenceConflict(_) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    /// Flatten validator output into one entry per failing field.
    /// Every failing field is reported, not just the first.
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    // Struct-level rules land under "__all__"; their code
                    // names the offending field
                    field: if *field == "__all__" {
                        e.code.to_string()
                    } else {
                        field.to_string()
                    },
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();
        let (message, details) = match self {
            AppError::Validation(fields) => ("Request validation failed".to_string(), Some(fields)),
            AppError::Store(e) => {
                // Driver detail is logged, never returned to the client
                tracing::error!("Store error: {:?}", e);
                ("Document store unavailable".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            error: kind.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::validation("title", "required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidReference("author".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("book".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Duplicate("isbn".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ReferenceConflict("author".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(AppError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(
            AppError::ReferenceConflict("x".into()).kind(),
            "reference_conflict"
        );
        assert_eq!(AppError::validation("f", "m").kind(), "validation_error");
    }

    #[test]
    fn validation_errors_report_every_field() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1, message = "must not be empty"))]
            title: String,
            #[validate(range(min = 1, message = "must be positive"))]
            year: i32,
        }

        let probe = Probe {
            title: String::new(),
            year: 0,
        };
        let err: AppError = probe.validate().unwrap_err().into();
        match err {
            AppError::Validation(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["title", "year"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
