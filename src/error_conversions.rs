//! Error conversion glue between the domain, repository and service layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::forms::listings::{CreateListingFormError, ListingIdsFormError};
use crate::forms::locations::LocationSearchFormError;
use crate::forms::swipes::CreateSwipeFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::InvalidArgument(val.to_string())
    }
}

impl From<CreateListingFormError> for ServiceError {
    fn from(val: CreateListingFormError) -> Self {
        ServiceError::InvalidArgument(val.to_string())
    }
}

impl From<ListingIdsFormError> for ServiceError {
    fn from(val: ListingIdsFormError) -> Self {
        ServiceError::InvalidArgument(val.to_string())
    }
}

impl From<LocationSearchFormError> for ServiceError {
    fn from(val: LocationSearchFormError) -> Self {
        ServiceError::InvalidArgument(val.to_string())
    }
}

impl From<CreateSwipeFormError> for ServiceError {
    fn from(val: CreateSwipeFormError) -> Self {
        ServiceError::InvalidArgument(val.to_string())
    }
}

/// Repository failures surface to callers as storage failures, except for
/// constraint violations, which mean the write raced with an equivalent one.
impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound("record not found".to_string()),
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}
