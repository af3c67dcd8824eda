use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::listing::{Listing as DomainListing, NewListing as DomainNewListing};
use crate::domain::types::{
    CurrencyCode, ListingCategory, ListingDescription, NightlyBudget, RadiusKm, TagName,
    TypeConstraintError,
};

/// Diesel model representing a row in the `listings` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::listings)]
pub struct Listing {
    pub id: i32,
    pub user_id: i32,
    pub location_id: i32,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub dates_are_approximate: bool,
    pub nightly_budget: Option<f64>,
    pub currency: Option<String>,
    pub radius: f64,
    pub description: Option<String>,
    pub is_complete: bool,
    pub prefers_same_gender: bool,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Listing`]. Tags are linked separately through
/// `listing_tags`.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::listings)]
pub struct NewListing<'a> {
    pub user_id: i32,
    pub location_id: i32,
    pub category: &'a str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub dates_are_approximate: bool,
    pub nightly_budget: Option<f64>,
    pub currency: Option<&'a str>,
    pub radius: f64,
    pub description: Option<&'a str>,
    pub is_complete: bool,
    pub prefers_same_gender: bool,
    pub created_at: NaiveDateTime,
}

/// A listing row together with the names of its tags.
impl TryFrom<(Listing, Vec<String>)> for DomainListing {
    type Error = TypeConstraintError;

    fn try_from((listing, tags): (Listing, Vec<String>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: listing.id.try_into()?,
            user_id: listing.user_id.try_into()?,
            location_id: listing.location_id.try_into()?,
            category: ListingCategory::try_from(listing.category)?,
            start_date: listing.start_date,
            end_date: listing.end_date,
            dates_are_approximate: listing.dates_are_approximate,
            nightly_budget: listing.nightly_budget.map(NightlyBudget::new).transpose()?,
            currency: listing.currency.map(CurrencyCode::new).transpose()?,
            radius: RadiusKm::new(listing.radius)?,
            description: listing
                .description
                .map(ListingDescription::new)
                .transpose()?,
            is_complete: listing.is_complete,
            prefers_same_gender: listing.prefers_same_gender,
            created_at: listing.created_at,
            tags: tags
                .into_iter()
                .map(TagName::new)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl<'a> From<&'a DomainNewListing> for NewListing<'a> {
    fn from(listing: &'a DomainNewListing) -> Self {
        Self {
            user_id: listing.user_id.get(),
            location_id: listing.location_id.get(),
            category: listing.category.as_str(),
            start_date: listing.start_date,
            end_date: listing.end_date,
            dates_are_approximate: listing.dates_are_approximate,
            nightly_budget: listing.nightly_budget.map(NightlyBudget::get),
            currency: listing.currency.as_ref().map(|currency| currency.as_str()),
            radius: listing.radius.get(),
            description: listing
                .description
                .as_ref()
                .map(|description| description.as_str()),
            is_complete: false,
            prefers_same_gender: listing.prefers_same_gender,
            created_at: listing.created_at,
        }
    }
}
