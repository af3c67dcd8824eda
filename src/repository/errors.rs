use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A record expected to exist was missing.
    #[error("record not found")]
    NotFound,
    /// A uniqueness, foreign key or check constraint rejected a write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// A stored value failed domain validation when loaded.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("database error: {0}")]
    DatabaseError(DieselError),
    #[error("connection error: {0}")]
    ConnectionError(#[from] PoolError),
}

impl From<DieselError> for RepositoryError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => RepositoryError::ConstraintViolation(format!("{kind:?}: {}", info.message())),
            other => RepositoryError::DatabaseError(other),
        }
    }
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
