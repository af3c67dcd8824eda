use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::listing::NewListing;
use crate::domain::location::NewLocation;
use crate::domain::types::{
    CountryCode, CurrencyCode, Latitude, ListingCategory, ListingDescription, ListingId, Locality,
    LocationId, LocationName, Longitude, NightlyBudget, RadiusKm, TagName, TypeConstraintError,
    UserId,
};

/// Date format accepted for listing start and end dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

fn default_radius() -> f64 {
    10.0
}

fn empty_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize, Validate)]
pub struct CreateListingForm {
    #[validate(length(min = 1))]
    pub category: String,
    pub location_name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub country: Option<String>,
    pub locality: Option<String>,
    #[validate(length(min = 1))]
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub dates_are_approximate: bool,
    #[validate(range(min = 0.0))]
    pub nightly_budget: Option<f64>,
    pub currency: Option<String>,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub prefers_same_gender: bool,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateListingFormPayload {
    pub location: NewLocation,
    pub category: ListingCategory,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub dates_are_approximate: bool,
    pub nightly_budget: Option<NightlyBudget>,
    pub currency: Option<CurrencyCode>,
    pub radius: RadiusKm,
    pub description: Option<ListingDescription>,
    pub prefers_same_gender: bool,
    pub tags: BTreeSet<TagName>,
}

impl CreateListingFormPayload {
    pub fn into_new_listing(self, user_id: UserId, location_id: LocationId) -> NewListing {
        NewListing {
            user_id,
            location_id,
            category: self.category,
            start_date: self.start_date,
            end_date: self.end_date,
            dates_are_approximate: self.dates_are_approximate,
            nightly_budget: self.nightly_budget,
            currency: self.currency,
            radius: self.radius,
            description: self.description,
            prefers_same_gender: self.prefers_same_gender,
            created_at: Utc::now().naive_utc(),
            tags: self.tags,
        }
    }
}

#[derive(Debug, Error)]
pub enum CreateListingFormError {
    #[error("Create listing form validation failed: {0}")]
    Validation(String),
    #[error("Create listing form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Invalid date format.")]
    InvalidDate,
    #[error("End date must be after start date.")]
    EndBeforeStart,
}

impl From<ValidationErrors> for CreateListingFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateListingFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CreateListingFormError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CreateListingFormError::InvalidDate)
}

impl TryFrom<CreateListingForm> for CreateListingFormPayload {
    type Error = CreateListingFormError;

    fn try_from(value: CreateListingForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let category = ListingCategory::try_from(value.category.trim())?;
        let start_date = parse_date(&value.start_date)?;
        let end_date = empty_to_none(value.end_date)
            .map(|d| parse_date(&d))
            .transpose()?;
        if end_date.is_some_and(|end| end <= start_date) {
            return Err(CreateListingFormError::EndBeforeStart);
        }

        let location = NewLocation {
            latitude: Latitude::new(value.latitude)?,
            longitude: Longitude::new(value.longitude)?,
            name: empty_to_none(value.location_name)
                .map(LocationName::new)
                .transpose()?,
            country: empty_to_none(value.country)
                .map(CountryCode::new)
                .transpose()?,
            locality: empty_to_none(value.locality)
                .map(Locality::new)
                .transpose()?,
        };

        let tags = value
            .tags
            .into_iter()
            .map(TagName::new)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            location,
            category,
            start_date,
            end_date,
            dates_are_approximate: value.dates_are_approximate,
            nightly_budget: value.nightly_budget.map(NightlyBudget::new).transpose()?,
            currency: empty_to_none(value.currency)
                .map(CurrencyCode::new)
                .transpose()?,
            radius: RadiusKm::new(value.radius)?,
            description: empty_to_none(value.description)
                .map(ListingDescription::new)
                .transpose()?,
            prefers_same_gender: value.prefers_same_gender,
            tags,
        })
    }
}

/// Comma separated listing ids, as in `?listing_ids=1,2,3`.
#[derive(Debug, Deserialize)]
pub struct ListingIdsForm {
    pub listing_ids: Option<String>,
}

#[derive(Debug, Error)]
pub enum ListingIdsFormError {
    #[error("Invalid listing id: {0}")]
    InvalidId(String),
    #[error("Listing ids contain invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for ListingIdsFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl ListingIdsForm {
    /// Parsed ids, or `None` when the parameter was not supplied.
    pub fn parse(&self) -> Result<Option<Vec<ListingId>>, ListingIdsFormError> {
        let Some(raw) = self.listing_ids.as_deref() else {
            return Ok(None);
        };
        let mut ids = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let value: i32 = part
                .parse()
                .map_err(|_| ListingIdsFormError::InvalidId(part.to_string()))?;
            ids.push(ListingId::new(value)?);
        }
        Ok(Some(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateListingForm {
        CreateListingForm {
            category: "short".to_string(),
            location_name: Some("Old Town".to_string()),
            latitude: -0.22,
            longitude: -78.51,
            country: Some("ec".to_string()),
            locality: Some("Quito".to_string()),
            start_date: "2031-05-01".to_string(),
            end_date: Some("2031-05-10".to_string()),
            dates_are_approximate: false,
            nightly_budget: Some(25.0),
            currency: Some("usd".to_string()),
            radius: 15.0,
            description: Some("  ".to_string()),
            prefers_same_gender: true,
            tags: vec!["Hiking".to_string(), " hiking ".to_string(), "food".to_string()],
        }
    }

    #[test]
    fn builds_payload_from_valid_form() {
        let payload = CreateListingFormPayload::try_from(form()).unwrap();

        assert_eq!(payload.category, ListingCategory::ShortTerm);
        assert_eq!(payload.location.country.unwrap().as_str(), "EC");
        assert_eq!(payload.currency.unwrap().as_str(), "USD");
        assert!(payload.description.is_none());
        let tags: Vec<&str> = payload.tags.iter().map(TagName::as_str).collect();
        assert_eq!(tags, vec!["food", "hiking"]);
    }

    #[test]
    fn rejects_unknown_category() {
        let mut form = form();
        form.category = "weekend".to_string();
        assert!(matches!(
            CreateListingFormPayload::try_from(form),
            Err(CreateListingFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let mut form = form();
        form.latitude = 95.0;
        assert!(matches!(
            CreateListingFormPayload::try_from(form),
            Err(CreateListingFormError::Validation(_))
        ));
    }

    #[test]
    fn rejects_bad_dates() {
        let mut malformed = form();
        malformed.start_date = "01/05/2031".to_string();
        assert!(matches!(
            CreateListingFormPayload::try_from(malformed),
            Err(CreateListingFormError::InvalidDate)
        ));

        let mut same_day = form();
        same_day.end_date = Some("2031-05-01".to_string());
        assert!(matches!(
            CreateListingFormPayload::try_from(same_day),
            Err(CreateListingFormError::EndBeforeStart)
        ));
    }

    #[test]
    fn rejects_negative_budget_and_zero_radius() {
        let mut budget = form();
        budget.nightly_budget = Some(-1.0);
        assert!(CreateListingFormPayload::try_from(budget).is_err());

        let mut radius = form();
        radius.radius = 0.0;
        assert!(matches!(
            CreateListingFormPayload::try_from(radius),
            Err(CreateListingFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn parses_listing_id_lists() {
        let form = ListingIdsForm {
            listing_ids: Some("3, 1,,2".to_string()),
        };
        let ids: Vec<i32> = form.parse().unwrap().unwrap().iter().map(|i| i.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        assert!(ListingIdsForm { listing_ids: None }.parse().unwrap().is_none());
        assert!(
            ListingIdsForm {
                listing_ids: Some("1,x".to_string())
            }
            .parse()
            .is_err()
        );
    }
}
