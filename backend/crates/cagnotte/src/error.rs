//! Cagnotte Error Types
//!
//! Campaign-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::ValidationError;

/// Cagnotte-specific result type alias
pub type CagnotteResult<T> = Result<T, CagnotteError>;

/// Cagnotte-specific error variants
#[derive(Debug, Error)]
pub enum CagnotteError {
    /// No cagnotte with that id
    #[error("Cagnotte not found")]
    NotFound,

    /// Cagnotte belongs to someone else
    #[error("Only the owner can modify this cagnotte")]
    NotOwner,

    /// Donation attempted after `ends_at`
    #[error("This cagnotte has ended and no longer accepts donations")]
    Ended,

    /// PATCH with no field set
    #[error("No fields to update")]
    EmptyChanges,

    /// Input validation error
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CagnotteError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CagnotteError::NotFound => StatusCode::NOT_FOUND,
            CagnotteError::NotOwner => StatusCode::FORBIDDEN,
            CagnotteError::Ended => StatusCode::GONE,
            CagnotteError::EmptyChanges | CagnotteError::Validation(_) => StatusCode::BAD_REQUEST,
            CagnotteError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CagnotteError::NotFound => ErrorKind::NotFound,
            CagnotteError::NotOwner => ErrorKind::Forbidden,
            CagnotteError::Ended => ErrorKind::Gone,
            CagnotteError::EmptyChanges | CagnotteError::Validation(_) => ErrorKind::BadRequest,
            CagnotteError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            CagnotteError::Database(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CagnotteError::Database(e) => {
                tracing::error!(error = %e, "Cagnotte database error");
            }
            CagnotteError::NotOwner => {
                tracing::warn!("Cagnotte modification attempted by non-owner");
            }
            _ => {
                tracing::debug!(error = %self, "Cagnotte error");
            }
        }
    }
}

impl From<CagnotteError> for AppError {
    fn from(err: CagnotteError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for CagnotteError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
