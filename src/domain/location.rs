use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::geo::GeoPoint;
use crate::domain::types::{CountryCode, Latitude, Locality, LocationId, LocationName, Longitude};

/// A point on the map that listings are situated at.
///
/// Locations are shared between listings and are never mutated once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub latitude: Latitude,
    pub longitude: Longitude,
    /// Distinguishes several named places at the very same coordinate.
    pub name: Option<LocationName>,
    pub country: Option<CountryCode>,
    pub locality: Option<Locality>,
    pub created_at: NaiveDateTime,
}

impl Location {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Data required to insert a new [`Location`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLocation {
    pub latitude: Latitude,
    pub longitude: Longitude,
    pub name: Option<LocationName>,
    pub country: Option<CountryCode>,
    pub locality: Option<Locality>,
}
