use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{ListingId, TypeConstraintError};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSwipeForm {
    #[validate(range(min = 1))]
    pub swiped_by_listing_id: i32,
    #[validate(range(min = 1))]
    pub swiped_on_listing_id: i32,
    #[serde(alias = "is_right_swipe")]
    pub is_like: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateSwipeFormPayload {
    pub swiped_by_listing_id: ListingId,
    pub swiped_on_listing_id: ListingId,
    pub is_like: bool,
}

#[derive(Debug, Error)]
pub enum CreateSwipeFormError {
    #[error("Create swipe form validation failed: {0}")]
    Validation(String),
    #[error("Create swipe form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateSwipeFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateSwipeFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateSwipeForm> for CreateSwipeFormPayload {
    type Error = CreateSwipeFormError;

    fn try_from(value: CreateSwipeForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            swiped_by_listing_id: ListingId::new(value.swiped_by_listing_id)?,
            swiped_on_listing_id: ListingId::new(value.swiped_on_listing_id)?,
            is_like: value.is_like,
        })
    }
}
