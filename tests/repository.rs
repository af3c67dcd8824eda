use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Utc;
use diesel::prelude::*;
use wayfare_matching::domain::geo::{BoundingBox, GeoPoint};
use wayfare_matching::domain::location::NewLocation;
use wayfare_matching::domain::matches::{MatchKey, NewMatch};
use wayfare_matching::domain::swipe::NewSwipe;
use wayfare_matching::domain::types::{CountryCode, Latitude, LocationName, Longitude};
use wayfare_matching::pagination::Pagination;
use wayfare_matching::repository::{
    ListingListQuery, ListingReader, ListingWriter, LocationReader, LocationWriter, MatchReader,
    MatchWriter, RepositoryError, SwipeListQuery, SwipeReader, SwipeWriter,
};
use wayfare_matching::schema::{locations, tags};

mod common;

use common::{create_listing, create_location};

#[test]
fn listings_round_trip_with_shared_tags() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let location = create_location(&repo, 0.0, 0.0);

    let first = create_listing(&repo, 1, &location, 10.0, &["food", "hiking"]);
    let second = create_listing(&repo, 2, &location, 5.0, &["hiking"]);

    let loaded = repo
        .get_listing_by_id(first.id)
        .expect("should load listing")
        .expect("listing should exist");
    assert_eq!(loaded, first);
    assert_eq!(second.tags.len(), 1);

    let mut conn = test_db.pool().get().expect("should get connection");
    let tag_count: i64 = tags::table
        .count()
        .get_result(&mut conn)
        .expect("should count tags");
    assert_eq!(tag_count, 2);

    let owned = repo
        .list_listings(ListingListQuery::default().user(first.user_id))
        .expect("should list listings");
    assert_eq!(owned, vec![first]);
}

#[test]
fn box_query_handles_the_antimeridian() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let east = create_location(&repo, 0.0, 179.99);
    let west = create_location(&repo, 0.0, -179.99);
    create_location(&repo, 0.0, 0.0);

    let center = GeoPoint::new(
        Latitude::new(0.0).expect("valid latitude"),
        Longitude::new(179.995).expect("valid longitude"),
    );
    let found = repo
        .list_locations_in_box(&BoundingBox::around(&center, 5.0))
        .expect("should query box");
    let mut ids: Vec<_> = found.iter().map(|l| l.id).collect();
    ids.sort();
    assert_eq!(ids, vec![east.id, west.id]);

    let (total, page) = repo
        .list_locations(Pagination::new(1, 2))
        .expect("should page locations");
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);

    let (total, beyond) = repo
        .list_locations(Pagination::new(usize::MAX, 20))
        .expect("should page locations");
    assert_eq!(total, 3);
    assert!(beyond.is_empty());
}

#[test]
fn second_swipe_for_a_pair_violates_the_unique_index() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let location = create_location(&repo, 0.0, 0.0);
    let a = create_listing(&repo, 1, &location, 10.0, &[]);
    let b = create_listing(&repo, 2, &location, 10.0, &[]);
    let now = Utc::now().naive_utc();

    repo.create_swipe(&NewSwipe::new(a.id, b.id, true, now).expect("valid swipe"))
        .expect("should create swipe");
    let duplicate = repo.create_swipe(&NewSwipe::new(a.id, b.id, false, now).expect("valid swipe"));
    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    repo.create_swipe(&NewSwipe::new(b.id, a.id, false, now).expect("valid swipe"))
        .expect("reverse direction is a different pair");

    let outgoing = repo
        .list_swipes(SwipeListQuery::default().by(vec![a.id]))
        .expect("should list swipes");
    assert_eq!(outgoing.len(), 1);
    assert!(outgoing[0].is_like);
    assert!(repo.find_swipe(b.id, a.id).expect("should find").is_some());
}

#[test]
fn create_match_is_insert_or_get() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let location = create_location(&repo, 0.0, 0.0);
    let a = create_listing(&repo, 1, &location, 10.0, &[]);
    let b = create_listing(&repo, 2, &location, 10.0, &[]);

    let key = MatchKey::new(b.id, a.id).expect("valid key");
    let first = repo
        .create_match(&NewMatch {
            key,
            matched_on: Utc::now().naive_utc(),
        })
        .expect("should create match");
    let second = repo
        .create_match(&NewMatch {
            key: MatchKey::new(a.id, b.id).expect("valid key"),
            matched_on: Utc::now().naive_utc(),
        })
        .expect("should return existing match");

    assert_eq!(first, second);
    assert_eq!(first.listing1_id, a.id);
    assert_eq!(repo.list_matches(&[b.id]).expect("should list").len(), 1);
    assert_eq!(
        repo.get_match_by_key(key).expect("should look up"),
        Some(first)
    );
}

#[test]
fn deleting_a_listing_cascades_to_swipes_and_matches() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let location = create_location(&repo, 0.0, 0.0);
    let a = create_listing(&repo, 1, &location, 10.0, &["food"]);
    let b = create_listing(&repo, 2, &location, 10.0, &["food"]);
    let now = Utc::now().naive_utc();

    repo.create_swipe(&NewSwipe::new(a.id, b.id, true, now).expect("valid swipe"))
        .expect("should create swipe");
    repo.create_swipe(&NewSwipe::new(b.id, a.id, true, now).expect("valid swipe"))
        .expect("should create swipe");
    repo.create_match(&NewMatch {
        key: MatchKey::new(a.id, b.id).expect("valid key"),
        matched_on: now,
    })
    .expect("should create match");

    assert_eq!(repo.delete_listing(a.id).expect("should delete"), 1);

    assert!(repo.get_listing_by_id(a.id).expect("should query").is_none());
    assert!(
        repo.list_swipes(SwipeListQuery::default().on(vec![b.id]))
            .expect("should list")
            .is_empty()
    );
    assert!(repo.list_matches(&[b.id]).expect("should list").is_empty());
    assert_eq!(
        repo.existing_listing_ids(&[a.id, b.id]).expect("should check"),
        vec![b.id]
    );
    assert!(
        repo.get_location_by_id(location.id)
            .expect("should query")
            .is_some()
    );
}

fn new_location(name: Option<&str>) -> NewLocation {
    NewLocation {
        latitude: Latitude::new(-2.9).expect("valid latitude"),
        longitude: Longitude::new(-79.0).expect("valid longitude"),
        name: name.map(|n| LocationName::new(n).expect("valid name")),
        country: Some(CountryCode::new("EC").expect("valid country")),
        locality: None,
    }
}

#[test]
fn location_identity_is_unique_in_storage() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let unnamed = repo
        .create_location(&new_location(None))
        .expect("should create location");
    let named = repo
        .create_location(&new_location(Some("Market")))
        .expect("should create location");
    assert_ne!(unnamed.id, named.id);

    assert_eq!(
        repo.create_location(&new_location(None))
            .expect("should return existing location")
            .id,
        unnamed.id
    );
    assert_eq!(
        repo.create_location(&new_location(Some("Market")))
            .expect("should return existing location")
            .id,
        named.id
    );

    let mut conn = test_db.pool().get().expect("should get connection");
    let count: i64 = locations::table
        .count()
        .get_result(&mut conn)
        .expect("should count locations");
    assert_eq!(count, 2);
}

#[test]
fn concurrent_location_creation_stores_one_row() {
    let test_db = common::TestDb::new();
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let repo = test_db.repo();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                repo.create_location(&new_location(Some("Plaza")))
            })
        })
        .collect();

    let ids: Vec<_> = handles
        .into_iter()
        .map(|h| {
            h.join()
                .expect("thread should finish")
                .expect("should create location")
                .id
        })
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));

    let mut conn = test_db.pool().get().expect("should get connection");
    let count: i64 = locations::table
        .count()
        .get_result(&mut conn)
        .expect("should count locations");
    assert_eq!(count, 1);
}
