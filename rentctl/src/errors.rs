//! Service error taxonomy and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

use crate::db::errors::DbError;
use crate::types::StockId;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed or missing request data; rejected before any storage access
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// The requested reservation would exceed the product's total stock on at
    /// least one day of the range
    #[error("Insufficient stock for reservation")]
    CapacityExceeded {
        stock_id: StockId,
        requested: i32,
        /// Units still free on the tightest day of the requested range
        available: i64,
    },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::CapacityExceeded { .. } => StatusCode::CONFLICT,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A user-safe message, without leaking internals.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { field, message } => format!("Invalid {field}: {message}"),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::CapacityExceeded { requested, available, .. } => {
                format!("Insufficient stock: requested {requested} units, at most {available} available across the range")
            }
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Database(DbError::Other(_)) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::CapacityExceeded { stock_id, requested, available } => {
                tracing::info!(%stock_id, requested, available, "Reservation rejected: capacity exceeded");
            }
            Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Capacity conflicts carry enough structure for the admin UI to
            // suggest a correction (fewer units or different dates)
            Error::CapacityExceeded { stock_id, requested, available } => {
                let body = json!({
                    "message": self.user_message(),
                    "stock_id": stock_id,
                    "requested": requested,
                    "available": available,
                });
                (status, axum::response::Json(body)).into_response()
            }
            Error::Validation { field, .. } => {
                let body = json!({
                    "message": self.user_message(),
                    "field": field,
                });
                (status, axum::response::Json(body)).into_response()
            }
            _ => (status, self.user_message()).into_response(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
