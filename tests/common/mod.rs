//! Helpers for integration tests.
#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;
use wayfare_matching::db::{DbPool, establish_connection_pool};
use wayfare_matching::domain::listing::{Listing, NewListing};
use wayfare_matching::domain::location::{Location, NewLocation};
use wayfare_matching::domain::types::{
    CountryCode, Latitude, ListingCategory, Longitude, RadiusKm, TagName, UserId,
};
use wayfare_matching::repository::{DieselRepository, ListingWriter, LocationWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn create_location(repo: &DieselRepository, latitude: f64, longitude: f64) -> Location {
    repo.create_location(&NewLocation {
        latitude: Latitude::new(latitude).expect("valid latitude"),
        longitude: Longitude::new(longitude).expect("valid longitude"),
        name: None,
        country: Some(CountryCode::new("EC").expect("valid country")),
        locality: None,
    })
    .expect("should create location")
}

pub fn create_listing(
    repo: &DieselRepository,
    user_id: i32,
    location: &Location,
    radius_km: f64,
    tags: &[&str],
) -> Listing {
    repo.create_listing(&NewListing {
        user_id: UserId::new(user_id).expect("valid user id"),
        location_id: location.id,
        category: ListingCategory::LongTerm,
        start_date: NaiveDate::from_ymd_opt(2031, 3, 1).expect("valid date"),
        end_date: None,
        dates_are_approximate: false,
        nightly_budget: None,
        currency: None,
        radius: RadiusKm::new(radius_km).expect("valid radius"),
        description: None,
        prefers_same_gender: false,
        created_at: Utc::now().naive_utc(),
        tags: tags
            .iter()
            .map(|t| TagName::new(*t).expect("valid tag"))
            .collect::<BTreeSet<_>>(),
    })
    .expect("should create listing")
}
