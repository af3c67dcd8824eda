use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ListingId, SwipeId, TypeConstraintError};

/// A one-directional like/pass decision of one listing about another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Swipe {
    pub id: SwipeId,
    pub swiped_by_listing_id: ListingId,
    pub swiped_on_listing_id: ListingId,
    pub is_like: bool,
    pub swiped_at: NaiveDateTime,
}

/// A validated swipe that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSwipe {
    pub swiped_by_listing_id: ListingId,
    pub swiped_on_listing_id: ListingId,
    pub is_like: bool,
    pub swiped_at: NaiveDateTime,
}

impl NewSwipe {
    /// Builds a swipe, rejecting a listing swiping on itself.
    pub fn new(
        swiped_by_listing_id: ListingId,
        swiped_on_listing_id: ListingId,
        is_like: bool,
        swiped_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        if swiped_by_listing_id == swiped_on_listing_id {
            return Err(TypeConstraintError::InvalidValue(
                "a listing cannot swipe on itself".to_string(),
            ));
        }
        Ok(Self {
            swiped_by_listing_id,
            swiped_on_listing_id,
            is_like,
            swiped_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn rejects_self_swipe() {
        let id = ListingId::new(3).unwrap();
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        assert!(NewSwipe::new(id, id, true, now).is_err());
        assert!(NewSwipe::new(id, ListingId::new(4).unwrap(), false, now).is_ok());
    }
}
