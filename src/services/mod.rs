pub mod errors;
pub mod listings;
pub mod locations;
pub mod matches;
pub mod recommendations;
pub mod swipes;

pub use errors::{ServiceError, ServiceResult};

use crate::repository::RepositoryError;

/// Log a repository failure with some context and convert it for the caller.
pub(crate) fn storage_error(context: &str) -> impl FnOnce(RepositoryError) -> ServiceError + '_ {
    move |e| {
        log::error!("{context}: {e}");
        ServiceError::from(e)
    }
}
