use crate::db::{DbConnection, DbPool};
use crate::domain::geo::BoundingBox;
use crate::domain::listing::{Listing, NewListing};
use crate::domain::location::{Location, NewLocation};
use crate::domain::matches::{Match, MatchKey, NewMatch};
use crate::domain::swipe::{NewSwipe, Swipe};
use crate::domain::types::{
    Latitude, ListingId, LocationId, LocationName, Longitude, MatchId, SwipeId, UserId,
};
use crate::pagination::Pagination;

pub mod errors;
pub mod listing;
pub mod location;
pub mod matches;
pub mod swipe;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing listings.
///
/// Filters combine with AND; an empty query returns every listing.
#[derive(Debug, Clone, Default)]
pub struct ListingListQuery {
    /// Restrict to listings owned by a user.
    pub user_id: Option<UserId>,
    /// Restrict to listings situated at any of these locations.
    pub location_ids: Option<Vec<LocationId>>,
    /// Restrict to these listing identifiers.
    pub ids: Option<Vec<ListingId>>,
}

impl ListingListQuery {
    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
    pub fn at_locations(mut self, location_ids: Vec<LocationId>) -> Self {
        self.location_ids = Some(location_ids);
        self
    }
    pub fn ids(mut self, ids: Vec<ListingId>) -> Self {
        self.ids = Some(ids);
        self
    }
}

/// Query parameters for listing swipes.
///
/// `swiped_by` selects outgoing swipes of the given listings and `swiped_on`
/// selects incoming ones; both together select swipes between the two sets.
#[derive(Debug, Clone, Default)]
pub struct SwipeListQuery {
    pub swiped_by: Option<Vec<ListingId>>,
    pub swiped_on: Option<Vec<ListingId>>,
}

impl SwipeListQuery {
    pub fn by(mut self, listing_ids: Vec<ListingId>) -> Self {
        self.swiped_by = Some(listing_ids);
        self
    }
    pub fn on(mut self, listing_ids: Vec<ListingId>) -> Self {
        self.swiped_on = Some(listing_ids);
        self
    }
}

/// Read-only operations for location entities.
pub trait LocationReader {
    /// Retrieve a location by its identifier.
    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>>;
    /// Retrieve several locations at once; unknown ids are skipped.
    fn list_locations_by_ids(&self, ids: &[LocationId]) -> RepositoryResult<Vec<Location>>;
    /// Find the location identified by an exact coordinate and name.
    fn find_location(
        &self,
        latitude: Latitude,
        longitude: Longitude,
        name: Option<&LocationName>,
    ) -> RepositoryResult<Option<Location>>;
    /// All locations at exactly this coordinate, whatever their name.
    fn list_locations_at(
        &self,
        latitude: Latitude,
        longitude: Longitude,
    ) -> RepositoryResult<Vec<Location>>;
    /// All locations whose coordinates fall inside the box.
    fn list_locations_in_box(&self, bbox: &BoundingBox) -> RepositoryResult<Vec<Location>>;
    /// Page through every stored location, ordered by id.
    fn list_locations(&self, pagination: Pagination) -> RepositoryResult<(usize, Vec<Location>)>;
}

/// Write operations for location entities.
pub trait LocationWriter {
    /// Persist a location and return it. An existing location with the same
    /// coordinate and name is returned instead of a duplicate.
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location>;
}

/// Read-only operations for listing entities. Returned listings carry their tags.
pub trait ListingReader {
    /// Retrieve a listing by its identifier.
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
    /// List listings matching the supplied query, ordered by id.
    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<Vec<Listing>>;
    /// Return the subset of `ids` that exist.
    fn existing_listing_ids(&self, ids: &[ListingId]) -> RepositoryResult<Vec<ListingId>>;
}

/// Write operations for listing entities and their tags.
pub trait ListingWriter {
    /// Persist a listing, creating missing tags, and return it.
    fn create_listing(&self, listing: &NewListing) -> RepositoryResult<Listing>;
    /// Delete a listing together with its swipes, matches and tag links.
    fn delete_listing(&self, id: ListingId) -> RepositoryResult<usize>;
}

/// Read-only operations for swipe entities.
pub trait SwipeReader {
    /// Retrieve a swipe by its identifier.
    fn get_swipe_by_id(&self, id: SwipeId) -> RepositoryResult<Option<Swipe>>;
    /// The swipe made by `by` on `on`, if any.
    fn find_swipe(&self, by: ListingId, on: ListingId) -> RepositoryResult<Option<Swipe>>;
    /// List swipes matching the supplied query, ordered by id.
    fn list_swipes(&self, query: SwipeListQuery) -> RepositoryResult<Vec<Swipe>>;
}

/// Write operations for swipe entities.
pub trait SwipeWriter {
    /// Persist a swipe. A second swipe for the same pair is a
    /// [`RepositoryError::ConstraintViolation`].
    fn create_swipe(&self, swipe: &NewSwipe) -> RepositoryResult<Swipe>;
    /// Delete a swipe by id.
    fn delete_swipe(&self, id: SwipeId) -> RepositoryResult<usize>;
}

/// Read-only operations for match entities.
pub trait MatchReader {
    /// Retrieve a match by its identifier.
    fn get_match_by_id(&self, id: MatchId) -> RepositoryResult<Option<Match>>;
    /// Retrieve the match stored under a canonical key.
    fn get_match_by_key(&self, key: MatchKey) -> RepositoryResult<Option<Match>>;
    /// Matches in which any of the listings take part, ordered by id.
    fn list_matches(&self, listing_ids: &[ListingId]) -> RepositoryResult<Vec<Match>>;
}

/// Write operations for match entities.
pub trait MatchWriter {
    /// Insert the match unless its key already exists and return the stored
    /// row. Safe against concurrent inserts of the same key.
    fn create_match(&self, new_match: &NewMatch) -> RepositoryResult<Match>;
    /// Delete a match by id.
    fn delete_match(&self, id: MatchId) -> RepositoryResult<usize>;
}
