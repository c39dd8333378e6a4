// ==========================================
// Porter Rota - API error type
// ==========================================
// Converts engine and storage errors into caller-facing messages.
// Every error carries an explicit reason.
// ==========================================

use crate::engine::RotaError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Input / lookup
    // ==========================================
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ==========================================
    // Rotation
    // ==========================================
    #[error("unknown shift group: {0}")]
    UnknownShiftGroup(String),

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // Storage
    // ==========================================
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // General
    // ==========================================
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={}) does not exist", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!(
                    "could not acquire database lock: {}",
                    msg
                ))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("unique constraint: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("foreign key constraint: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DataIntegrity(format!("field {}: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<RotaError> for ApiError {
    fn from(err: RotaError) -> Self {
        match err {
            RotaError::UnknownShiftGroup { group_name } => ApiError::UnknownShiftGroup(group_name),
            RotaError::InvalidDateRange { start, end } => {
                ApiError::InvalidDateRange(format!("end {} is before start {}", end, start))
            }
            RotaError::DateRangeTooLong {
                start,
                end,
                max_days,
            } => ApiError::InvalidDateRange(format!(
                "{} to {} spans more than {} days",
                start, end, max_days
            )),
            RotaError::MissingDepartment { department_id } => ApiError::DataIntegrity(format!(
                "department {} referenced but does not exist",
                department_id
            )),
            RotaError::MissingPorter { porter_id } => {
                ApiError::NotFound(format!("porter {} does not exist or is inactive", porter_id))
            }
            RotaError::Repository(err) => err.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
