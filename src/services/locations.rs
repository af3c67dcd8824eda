//! Radius search over stored locations.

use crate::domain::geo::{BoundingBox, GeoPoint};
use crate::domain::location::{Location, NewLocation};
use crate::domain::types::{Latitude, Longitude};
use crate::dto::listings::LocationDto;
use crate::forms::locations::LocationSearchPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};
use crate::repository::{LocationReader, LocationWriter};

use super::{ServiceError, ServiceResult, storage_error};

/// Locations within `radius_meters` of a coordinate, nearest first.
///
/// A radius of zero selects the locations at exactly that coordinate. Pages
/// are 1-indexed and hold [`DEFAULT_ITEMS_PER_PAGE`] entries.
pub fn locations_within_radius<R>(
    repo: &R,
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
    page: usize,
) -> ServiceResult<Vec<Location>>
where
    R: LocationReader,
{
    if page < 1 {
        return Err(ServiceError::InvalidArgument(
            "page must be 1 or greater".to_string(),
        ));
    }
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(ServiceError::InvalidArgument(
            "radius must be zero or greater".to_string(),
        ));
    }
    let center = GeoPoint::new(Latitude::new(latitude)?, Longitude::new(longitude)?);

    let locations = nearby_locations(repo, &center, radius_meters / 1000.0)?;
    Ok(Pagination::new(page, DEFAULT_ITEMS_PER_PAGE).apply(locations))
}

/// Every location within `radius_km` of `center`, ordered by distance and
/// then id.
pub fn nearby_locations<R>(repo: &R, center: &GeoPoint, radius_km: f64) -> ServiceResult<Vec<Location>>
where
    R: LocationReader,
{
    if radius_km == 0.0 {
        return repo
            .list_locations_at(center.latitude, center.longitude)
            .map_err(storage_error("Failed to list locations at coordinate"));
    }

    let bbox = BoundingBox::around(center, radius_km);
    let candidates = repo
        .list_locations_in_box(&bbox)
        .map_err(storage_error("Failed to list locations in bounding box"))?;

    let mut within: Vec<(f64, Location)> = candidates
        .into_iter()
        .map(|location| (center.distance_km(&location.point()), location))
        .filter(|(distance, _)| *distance <= radius_km)
        .collect();

    within.sort_by(|(da, a), (db, b)| da.total_cmp(db).then(a.id.cmp(&b.id)));

    Ok(within.into_iter().map(|(_, location)| location).collect())
}

/// Map search used by the location endpoint. Without a center every stored
/// location is paged through in id order.
pub fn search_locations<R>(
    payload: LocationSearchPayload,
    repo: &R,
) -> ServiceResult<Vec<LocationDto>>
where
    R: LocationReader,
{
    let locations = match payload.coordinates {
        Some((latitude, longitude)) => locations_within_radius(
            repo,
            latitude,
            longitude,
            payload.radius_meters,
            payload.page,
        )?,
        None => {
            let pagination = Pagination::new(payload.page.max(1), DEFAULT_ITEMS_PER_PAGE);
            let (_total, locations) = repo
                .list_locations(pagination)
                .map_err(storage_error("Failed to list locations"))?;
            locations
        }
    };
    Ok(locations.into_iter().map(LocationDto::from).collect())
}

/// Return the stored location with the same coordinate and name, creating
/// it when there is none.
pub fn find_or_create_location<R>(location: &NewLocation, repo: &R) -> ServiceResult<Location>
where
    R: LocationReader + LocationWriter,
{
    let existing = repo
        .find_location(location.latitude, location.longitude, location.name.as_ref())
        .map_err(storage_error("Failed to look up location"))?;

    match existing {
        Some(location) => Ok(location),
        None => {
            let created = repo
                .create_location(location)
                .map_err(storage_error("Failed to create location"))?;
            log::info!(
                "Created location #{} at ({}, {})",
                created.id,
                created.latitude,
                created.longitude
            );
            Ok(created)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::types::{CountryCode, LocationId, LocationName};
    use crate::repository::test::TestRepository;

    fn location(id: i32, latitude: f64, longitude: f64, name: Option<&str>) -> Location {
        Location {
            id: LocationId::new(id).unwrap(),
            latitude: Latitude::new(latitude).unwrap(),
            longitude: Longitude::new(longitude).unwrap(),
            name: name.map(|n| LocationName::new(n).unwrap()),
            country: Some(CountryCode::new("EC").unwrap()),
            locality: None,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn ids(locations: &[Location]) -> Vec<i32> {
        locations.iter().map(|l| l.id.get()).collect()
    }

    #[test]
    fn rejects_invalid_arguments() {
        let repo = TestRepository::default();
        for (lat, lon, radius, page) in [
            (91.0, 0.0, 10.0, 1),
            (0.0, -180.5, 10.0, 1),
            (0.0, 0.0, -1.0, 1),
            (0.0, 0.0, 10.0, 0),
            (f64::NAN, 0.0, 10.0, 1),
        ] {
            let result = locations_within_radius(&repo, lat, lon, radius, page);
            assert!(
                matches!(result, Err(ServiceError::InvalidArgument(_))),
                "({lat}, {lon}, {radius}, {page}) was accepted"
            );
        }
    }

    #[test]
    fn zero_radius_returns_exact_coordinate_matches() {
        let repo = TestRepository::new(
            vec![
                location(1, 10.0, 20.0, None),
                location(2, 10.0, 20.0, Some("Harbour")),
                location(3, 10.0, 20.0001, None),
            ],
            vec![],
        );

        let found = locations_within_radius(&repo, 10.0, 20.0, 0.0, 1).unwrap();
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn filters_box_corners_and_orders_by_distance() {
        // The box around (0, 0) with a 10 km radius contains (0.08, 0.08),
        // but that corner is ~12.6 km away.
        let repo = TestRepository::new(
            vec![
                location(1, 0.05, 0.0, None),
                location(2, 0.08, 0.08, None),
                location(3, 0.01, 0.0, None),
                location(4, 0.0, 0.05, None),
                location(5, 1.0, 1.0, None),
            ],
            vec![],
        );

        let found = locations_within_radius(&repo, 0.0, 0.0, 10_000.0, 1).unwrap();
        assert_eq!(ids(&found), vec![3, 1, 4]);
    }

    #[test]
    fn crosses_the_antimeridian() {
        let repo = TestRepository::new(
            vec![
                location(1, 0.0, -179.99, None),
                location(2, 0.0, 179.99, None),
                location(3, 0.0, 0.0, None),
            ],
            vec![],
        );

        let found = locations_within_radius(&repo, 0.0, 179.995, 5_000.0, 1).unwrap();
        assert_eq!(ids(&found), vec![2, 1]);
    }

    #[test]
    fn paginates_results() {
        let locations = (1..=25)
            .map(|id| location(id, 0.0, id as f64 * 0.001, None))
            .collect();
        let repo = TestRepository::new(locations, vec![]);

        let first = locations_within_radius(&repo, 0.0, 0.0, 50_000.0, 1).unwrap();
        let second = locations_within_radius(&repo, 0.0, 0.0, 50_000.0, 2).unwrap();
        let third = locations_within_radius(&repo, 0.0, 0.0, 50_000.0, 3).unwrap();

        assert_eq!(first.len(), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(ids(&second), vec![21, 22, 23, 24, 25]);
        assert!(third.is_empty());
    }

    #[test]
    fn page_far_past_the_end_is_empty() {
        let repo = TestRepository::new(vec![location(1, 0.0, 0.0, None)], vec![]);

        assert!(
            locations_within_radius(&repo, 0.0, 0.0, 1000.0, usize::MAX)
                .unwrap()
                .is_empty()
        );

        let payload = LocationSearchPayload {
            coordinates: None,
            radius_meters: 0.0,
            page: usize::MAX,
        };
        assert!(search_locations(payload, &repo).unwrap().is_empty());
    }

    #[test]
    fn search_without_center_pages_all_locations() {
        let locations = (1..=22)
            .map(|id| location(id, id as f64, 0.0, None))
            .collect();
        let repo = TestRepository::new(locations, vec![]);

        let payload = LocationSearchPayload {
            coordinates: None,
            radius_meters: 0.0,
            page: 2,
        };
        let found = search_locations(payload, &repo).unwrap();
        let found: Vec<i32> = found.iter().map(|l| l.id).collect();
        assert_eq!(found, vec![21, 22]);
    }

    #[test]
    fn find_or_create_reuses_matching_location() {
        let repo = TestRepository::new(vec![location(1, 5.0, 5.0, Some("Pier"))], vec![]);

        let same = NewLocation {
            latitude: Latitude::new(5.0).unwrap(),
            longitude: Longitude::new(5.0).unwrap(),
            name: Some(LocationName::new("Pier").unwrap()),
            country: Some(CountryCode::new("EC").unwrap()),
            locality: None,
        };
        assert_eq!(find_or_create_location(&same, &repo).unwrap().id.get(), 1);

        let unnamed = NewLocation { name: None, ..same };
        let created = find_or_create_location(&unnamed, &repo).unwrap();
        assert_ne!(created.id.get(), 1);
        assert_eq!(
            find_or_create_location(&unnamed, &repo).unwrap().id,
            created.id
        );
    }
}
