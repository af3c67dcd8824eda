use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::listing::Listing;
use crate::domain::location::Location;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    pub country: Option<String>,
    pub locality: Option<String>,
}

impl From<Location> for LocationDto {
    fn from(value: Location) -> Self {
        Self {
            id: value.id.get(),
            latitude: value.latitude.get(),
            longitude: value.longitude.get(),
            name: value.name.map(|n| n.into_inner()),
            country: value.country.map(|c| c.as_str().to_string()),
            locality: value.locality.map(|l| l.into_inner()),
        }
    }
}

/// API view of a listing with its location flattened in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
    pub id: i32,
    pub user_id: i32,
    pub category: String,
    pub location_id: i32,
    pub location_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub locality: Option<String>,
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
    pub tags: Vec<String>,
}

impl From<(Listing, Location)> for ListingDto {
    fn from((listing, location): (Listing, Location)) -> Self {
        Self {
            id: listing.id.get(),
            user_id: listing.user_id.get(),
            category: listing.category.as_str().to_string(),
            location_id: location.id.get(),
            location_name: location.name.map(|n| n.into_inner()),
            latitude: location.latitude.get(),
            longitude: location.longitude.get(),
            country: location.country.map(|c| c.as_str().to_string()),
            locality: location.locality.map(|l| l.into_inner()),
            start_date: listing.start_date,
            end_date: listing.end_date,
            dates_are_approximate: listing.dates_are_approximate,
            nightly_budget: listing.nightly_budget.map(f64::from),
            currency: listing.currency.map(|c| c.as_str().to_string()),
            radius: listing.radius.get(),
            description: listing.description.map(|d| d.into_inner()),
            is_complete: listing.is_complete,
            prefers_same_gender: listing.prefers_same_gender,
            created_at: listing.created_at,
            tags: listing.tags.into_iter().map(String::from).collect(),
        }
    }
}
