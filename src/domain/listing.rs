use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CurrencyCode, ListingCategory, ListingDescription, ListingId, LocationId, NightlyBudget,
    RadiusKm, TagName, UserId,
};

/// A user's posted travel or hosting intent; the unit being matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub category: ListingCategory,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub dates_are_approximate: bool,
    pub nightly_budget: Option<NightlyBudget>,
    pub currency: Option<CurrencyCode>,
    /// Matching range of this listing, in kilometres.
    pub radius: RadiusKm,
    pub description: Option<ListingDescription>,
    /// A complete listing is no longer looking for matches.
    pub is_complete: bool,
    pub prefers_same_gender: bool,
    pub created_at: NaiveDateTime,
    pub tags: BTreeSet<TagName>,
}

impl Listing {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Information required to create a new [`Listing`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewListing {
    pub user_id: UserId,
    pub location_id: LocationId,
    pub category: ListingCategory,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub dates_are_approximate: bool,
    pub nightly_budget: Option<NightlyBudget>,
    pub currency: Option<CurrencyCode>,
    pub radius: RadiusKm,
    pub description: Option<ListingDescription>,
    pub prefers_same_gender: bool,
    pub created_at: NaiveDateTime,
    pub tags: BTreeSet<TagName>,
}
