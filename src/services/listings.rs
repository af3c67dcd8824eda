use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::domain::geo::GeoPoint;
use crate::domain::listing::Listing;
use crate::domain::location::Location;
use crate::domain::types::{ListingId, LocationId};
use crate::domain::user::AuthenticatedUser;
use crate::dto::listings::ListingDto;
use crate::forms::listings::CreateListingFormPayload;
use crate::repository::{
    ListingListQuery, ListingReader, ListingWriter, LocationReader, LocationWriter,
};

use super::locations::{find_or_create_location, nearby_locations};
use super::{ServiceError, ServiceResult, storage_error};

pub(crate) fn listing_not_found(id: ListingId) -> ServiceError {
    ServiceError::NotFound(format!("Listing #{id} not found."))
}

/// Load a listing or fail with `NotFound`.
pub(crate) fn require_listing<R>(repo: &R, id: ListingId) -> ServiceResult<Listing>
where
    R: ListingReader,
{
    repo.get_listing_by_id(id)
        .map_err(storage_error("Failed to get listing"))?
        .ok_or_else(|| listing_not_found(id))
}

/// Load a listing and check that `user` owns it.
pub(crate) fn require_owned_listing<R>(
    repo: &R,
    id: ListingId,
    user: &AuthenticatedUser,
) -> ServiceResult<Listing>
where
    R: ListingReader,
{
    let listing = require_listing(repo, id)?;
    if !listing.is_owned_by(user.user_id) {
        return Err(ServiceError::Forbidden);
    }
    Ok(listing)
}

fn invalid_location() -> ServiceError {
    ServiceError::InvalidArgument("Invalid location.".to_string())
}

fn require_location<R>(repo: &R, id: LocationId) -> ServiceResult<Location>
where
    R: LocationReader,
{
    repo.get_location_by_id(id)
        .map_err(storage_error("Failed to get location"))?
        .ok_or_else(|| ServiceError::NotFound(format!("Location #{id} not found.")))
}

fn into_dtos<R>(repo: &R, listings: Vec<Listing>) -> ServiceResult<Vec<ListingDto>>
where
    R: LocationReader,
{
    let mut location_ids: Vec<LocationId> = listings.iter().map(|l| l.location_id).collect();
    location_ids.sort();
    location_ids.dedup();

    let locations: HashMap<LocationId, Location> = repo
        .list_locations_by_ids(&location_ids)
        .map_err(storage_error("Failed to list locations"))?
        .into_iter()
        .map(|location| (location.id, location))
        .collect();

    listings
        .into_iter()
        .map(|listing| match locations.get(&listing.location_id) {
            Some(location) => Ok(ListingDto::from((listing, location.clone()))),
            None => {
                log::error!(
                    "Listing #{} references missing location #{}",
                    listing.id,
                    listing.location_id
                );
                Err(ServiceError::Internal)
            }
        })
        .collect()
}

/// Listings whose own radius reaches the requester.
///
/// Candidates are discovered within the requester's radius and then kept
/// only when the distance is within the candidate's radius as well. A
/// complete requester has no feasible candidates.
pub fn feasible_listings_in_range<R>(repo: &R, listing_id: ListingId) -> ServiceResult<Vec<Listing>>
where
    R: ListingReader + LocationReader,
{
    let listing = require_listing(repo, listing_id)?;
    if listing.is_complete {
        return Ok(vec![]);
    }

    let origin = require_location(repo, listing.location_id)?.point();
    let nearby = nearby_locations(repo, &origin, listing.radius.get())?;
    if nearby.is_empty() {
        return Ok(vec![]);
    }

    let points: HashMap<LocationId, GeoPoint> = nearby
        .iter()
        .map(|location| (location.id, location.point()))
        .collect();

    let candidates = repo
        .list_listings(ListingListQuery::default().at_locations(points.keys().copied().collect()))
        .map_err(storage_error("Failed to list listings at nearby locations"))?;

    Ok(candidates
        .into_iter()
        .filter(|candidate| candidate.id != listing.id)
        .filter(|candidate| {
            points
                .get(&candidate.location_id)
                .is_some_and(|point| origin.distance_km(point) <= candidate.radius.get())
        })
        .collect())
}

/// Create a listing for `user`, reusing or creating its location.
pub fn create_listing<R>(
    payload: CreateListingFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ListingDto>
where
    R: ListingWriter + LocationReader + LocationWriter,
{
    create_listing_on(payload, user, repo, Utc::now().date_naive())
}

/// [`create_listing`] with an explicit current date.
pub fn create_listing_on<R>(
    payload: CreateListingFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    today: NaiveDate,
) -> ServiceResult<ListingDto>
where
    R: ListingWriter + LocationReader + LocationWriter,
{
    if payload.start_date < today {
        return Err(ServiceError::InvalidArgument(
            "Start date must not be in the past.".to_string(),
        ));
    }

    // Only locations with a known country may be created.
    let location = if payload.location.country.is_some() {
        find_or_create_location(&payload.location, repo)?
    } else {
        repo.find_location(
            payload.location.latitude,
            payload.location.longitude,
            payload.location.name.as_ref(),
        )
        .map_err(storage_error("Failed to look up location"))?
        .ok_or_else(invalid_location)?
    };
    if location.country.is_none() {
        return Err(invalid_location());
    }

    let new_listing = payload.into_new_listing(user.user_id, location.id);
    let listing = repo
        .create_listing(&new_listing)
        .map_err(storage_error("Failed to create listing"))?;

    log::info!(
        "User #{} created listing #{} at location #{}",
        user.user_id,
        listing.id,
        location.id
    );

    Ok(ListingDto::from((listing, location)))
}

pub fn get_listing<R>(listing_id: ListingId, repo: &R) -> ServiceResult<ListingDto>
where
    R: ListingReader + LocationReader,
{
    let listing = require_listing(repo, listing_id)?;
    let location = require_location(repo, listing.location_id)?;
    Ok(ListingDto::from((listing, location)))
}

pub fn list_user_listings<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<ListingDto>>
where
    R: ListingReader + LocationReader,
{
    let listings = repo
        .list_listings(ListingListQuery::default().user(user.user_id))
        .map_err(storage_error("Failed to list user listings"))?;
    into_dtos(repo, listings)
}

/// Delete a listing owned by `user` along with its swipes and matches.
pub fn delete_listing<R>(listing_id: ListingId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ListingReader + ListingWriter,
{
    require_owned_listing(repo, listing_id, user)?;

    match repo.delete_listing(listing_id) {
        Ok(0) => Err(listing_not_found(listing_id)),
        Ok(_) => {
            log::info!("User #{} deleted listing #{listing_id}", user.user_id);
            Ok(())
        }
        Err(e) => Err(storage_error("Failed to delete listing")(e)),
    }
}
