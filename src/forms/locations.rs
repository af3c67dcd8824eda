use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Query string of the location search: `latlng=lat,lon&radius=m&page=n`.
#[derive(Debug, Deserialize, Validate)]
pub struct LocationSearchForm {
    pub latlng: Option<String>,
    #[validate(range(min = 0.0))]
    pub radius: Option<f64>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSearchPayload {
    /// Search center; without one every location is paged through.
    pub coordinates: Option<(f64, f64)>,
    pub radius_meters: f64,
    pub page: usize,
}

#[derive(Debug, Error)]
pub enum LocationSearchFormError {
    #[error("Location search validation failed: {0}")]
    Validation(String),
    #[error("Invalid coordinates.")]
    InvalidCoordinates,
}

impl From<ValidationErrors> for LocationSearchFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

fn parse_latlng(value: &str) -> Result<(f64, f64), LocationSearchFormError> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or(LocationSearchFormError::InvalidCoordinates)?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| LocationSearchFormError::InvalidCoordinates)?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| LocationSearchFormError::InvalidCoordinates)?;
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(LocationSearchFormError::InvalidCoordinates);
    }
    Ok((lat, lon))
}

impl TryFrom<LocationSearchForm> for LocationSearchPayload {
    type Error = LocationSearchFormError;

    fn try_from(value: LocationSearchForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            coordinates: value.latlng.as_deref().map(parse_latlng).transpose()?,
            radius_meters: value.radius.unwrap_or(0.0),
            page: value.page.unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates_and_defaults() {
        let payload = LocationSearchPayload::try_from(LocationSearchForm {
            latlng: Some("51.5, -0.12".to_string()),
            radius: None,
            page: None,
        })
        .unwrap();

        assert_eq!(payload.coordinates, Some((51.5, -0.12)));
        assert_eq!(payload.radius_meters, 0.0);
        assert_eq!(payload.page, 1);
    }

    #[test]
    fn rejects_malformed_coordinates() {
        for latlng in ["51.5", "north,west", "91,0", "0,181"] {
            let result = LocationSearchPayload::try_from(LocationSearchForm {
                latlng: Some(latlng.to_string()),
                radius: Some(100.0),
                page: Some(1),
            });
            assert!(
                matches!(result, Err(LocationSearchFormError::InvalidCoordinates)),
                "{latlng} was accepted"
            );
        }
    }

    #[test]
    fn rejects_page_zero_and_negative_radius() {
        let page = LocationSearchPayload::try_from(LocationSearchForm {
            latlng: None,
            radius: None,
            page: Some(0),
        });
        assert!(matches!(page, Err(LocationSearchFormError::Validation(_))));

        let radius = LocationSearchPayload::try_from(LocationSearchForm {
            latlng: None,
            radius: Some(-5.0),
            page: None,
        });
        assert!(matches!(radius, Err(LocationSearchFormError::Validation(_))));
    }
}
