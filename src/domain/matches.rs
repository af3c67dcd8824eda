use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ListingId, MatchId, TypeConstraintError};

/// Canonical key of an undirected listing pair: the lower id always comes first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MatchKey {
    listing1_id: ListingId,
    listing2_id: ListingId,
}

impl MatchKey {
    /// Orders the pair so that `MatchKey::new(a, b) == MatchKey::new(b, a)`.
    pub fn new(a: ListingId, b: ListingId) -> Result<Self, TypeConstraintError> {
        if a == b {
            return Err(TypeConstraintError::InvalidValue(
                "a listing cannot match itself".to_string(),
            ));
        }
        Ok(Self {
            listing1_id: a.min(b),
            listing2_id: a.max(b),
        })
    }

    pub const fn listing1_id(self) -> ListingId {
        self.listing1_id
    }

    pub const fn listing2_id(self) -> ListingId {
        self.listing2_id
    }
}

/// A mutual like between two listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub listing1_id: ListingId,
    pub listing2_id: ListingId,
    pub matched_on: NaiveDateTime,
}

impl Match {
    pub fn involves(&self, listing_id: ListingId) -> bool {
        self.listing1_id == listing_id || self.listing2_id == listing_id
    }

    /// The listing on the other side of the match from `listing_id`.
    pub fn counterpart(&self, listing_id: ListingId) -> Option<ListingId> {
        if self.listing1_id == listing_id {
            Some(self.listing2_id)
        } else if self.listing2_id == listing_id {
            Some(self.listing1_id)
        } else {
            None
        }
    }
}

/// Data required to insert a new [`Match`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMatch {
    pub key: MatchKey,
    pub matched_on: NaiveDateTime,
}
