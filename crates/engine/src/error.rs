//! The module contains the errors the engine can return.
//!
//! Every service returns the most specific kind it can:
//!
//! - [`NotFound`] when a row is absent, soft-deleted or owned by someone else.
//! - [`Forbidden`] when a system-defined row would be mutated.
//! - [`Validation`] for input that passed binding but breaks a domain rule.
//! - [`Duplicate`] when a scoped uniqueness rule is violated.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Validation`]: EngineError::Validation
//!  [`Duplicate`]: EngineError::Duplicate
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{message}")]
    Validation { field: String, message: String },
    #[error("{0}")]
    Duplicate(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(DbErr),
}

impl EngineError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        // Partial unique indexes back the application-level duplicate checks;
        // a concurrent writer that slips past the check lands here.
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = value.sql_err() {
            tracing::warn!("unique constraint violation: {detail}");
            return Self::Duplicate("record already exists".to_string());
        }
        Self::Database(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (
                Self::Validation {
                    field: fa,
                    message: ma,
                },
                Self::Validation {
                    field: fb,
                    message: mb,
                },
            ) => fa == fb && ma == mb,
            (Self::Duplicate(a), Self::Duplicate(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
