use thiserror::Error;

/// Error kinds produced by the matching core. The HTTP layer maps each kind
/// to a status code; the services themselves know nothing about transport.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A referenced listing, swipe or match does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Malformed coordinates, non-positive radius, self swipe and similar.
    #[error("{0}")]
    InvalidArgument(String),
    /// The action was redundant, e.g. a repeated swipe.
    #[error("{0}")]
    Conflict(String),
    /// The caller is not authenticated.
    #[error("unauthorized")]
    Unauthorized,
    /// The caller does not own the resource.
    #[error("forbidden")]
    Forbidden,
    /// Persistence failed; any transaction in flight was rolled back.
    #[error("storage failure: {0}")]
    Storage(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
