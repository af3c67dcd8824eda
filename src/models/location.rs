use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::location::{Location as DomainLocation, NewLocation as DomainNewLocation};
use crate::domain::types::{CountryCode, Latitude, Locality, LocationName, Longitude, TypeConstraintError};

/// Diesel model representing a row in the `locations` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::locations)]
pub struct Location {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    pub country: Option<String>,
    pub locality: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Location`]; `created_at` is filled by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::locations)]
pub struct NewLocation<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<&'a str>,
    pub country: Option<&'a str>,
    pub locality: Option<&'a str>,
}

impl TryFrom<Location> for DomainLocation {
    type Error = TypeConstraintError;

    fn try_from(location: Location) -> Result<Self, Self::Error> {
        Ok(Self {
            id: location.id.try_into()?,
            latitude: Latitude::new(location.latitude)?,
            longitude: Longitude::new(location.longitude)?,
            name: location.name.map(LocationName::new).transpose()?,
            country: location.country.map(CountryCode::new).transpose()?,
            locality: location.locality.map(Locality::new).transpose()?,
            created_at: location.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewLocation> for NewLocation<'a> {
    fn from(location: &'a DomainNewLocation) -> Self {
        Self {
            latitude: location.latitude.get(),
            longitude: location.longitude.get(),
            name: location.name.as_ref().map(|name| name.as_str()),
            country: location.country.as_ref().map(|country| country.as_str()),
            locality: location.locality.as_ref().map(|locality| locality.as_str()),
        }
    }
}
