use std::sync::{Arc, Barrier};
use std::thread;

use wayfare_matching::domain::types::ListingId;
use wayfare_matching::repository::MatchReader;
use wayfare_matching::services::ServiceError;
use wayfare_matching::services::listings::feasible_listings_in_range;
use wayfare_matching::services::matches::create_match;
use wayfare_matching::services::recommendations::listing_recommendations;
use wayfare_matching::services::swipes::{create_swipe, listings_filtered_by_swipes};

mod common;

use common::{create_listing, create_location};

#[test]
fn recommendations_follow_swipes_end_to_end() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let here = create_location(&repo, -0.22, -78.51);
    let near = create_location(&repo, -0.22, -78.50);
    let far = create_location(&repo, 40.0, -3.7);

    let me = create_listing(&repo, 1, &here, 20.0, &["food", "hiking"]);
    let close_match = create_listing(&repo, 2, &near, 20.0, &["hiking"]);
    let best_match = create_listing(&repo, 3, &near, 20.0, &["hiking", "food", "surf"]);
    let short_range = create_listing(&repo, 4, &near, 0.5, &["food", "hiking"]);
    create_listing(&repo, 5, &far, 20_000.0, &["food", "hiking"]);

    let feasible: Vec<ListingId> = feasible_listings_in_range(&repo, me.id)
        .expect("should compute feasible listings")
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert!(!feasible.contains(&me.id));
    assert!(!feasible.contains(&short_range.id));

    let ranked = listing_recommendations(&repo, me.id).expect("should rank");
    assert_eq!(ranked, vec![best_match.id, close_match.id]);

    create_swipe(&repo, me.id, best_match.id, true).expect("should like");
    let ranked = listing_recommendations(&repo, me.id).expect("should rank");
    assert_eq!(ranked, vec![close_match.id]);

    create_swipe(&repo, me.id, close_match.id, false).expect("should pass");
    let ranked = listing_recommendations(&repo, me.id).expect("should rank");
    assert_eq!(ranked, vec![close_match.id]);

    assert!(
        listings_filtered_by_swipes(&repo, me.id, &[best_match.id])
            .expect("should filter")
            .is_empty()
    );
}

#[test]
fn reciprocal_likes_match_once_and_duplicates_conflict() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let location = create_location(&repo, 0.0, 0.0);
    let a = create_listing(&repo, 1, &location, 10.0, &[]);
    let b = create_listing(&repo, 2, &location, 10.0, &[]);

    assert!(
        create_swipe(&repo, b.id, a.id, true)
            .expect("should like")
            .matched
            .is_none()
    );
    let matched = create_swipe(&repo, a.id, b.id, true)
        .expect("should like back")
        .matched
        .expect("should match");
    assert_eq!((matched.listing1_id, matched.listing2_id), (a.id, b.id));

    assert!(matches!(
        create_swipe(&repo, a.id, b.id, true),
        Err(ServiceError::Conflict(_))
    ));
    assert_eq!(create_match(&repo, b.id, a.id).expect("idempotent"), matched);
    assert_eq!(repo.list_matches(&[a.id]).expect("should list").len(), 1);
}

#[test]
fn concurrent_match_creation_stores_one_row() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let location = create_location(&repo, 0.0, 0.0);
    let a = create_listing(&repo, 1, &location, 10.0, &[]).id;
    let b = create_listing(&repo, 2, &location, 10.0, &[]).id;

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let repo = test_db.repo();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    create_match(&repo, a, b)
                } else {
                    create_match(&repo, b, a)
                }
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread should finish").expect("should match"))
        .collect();

    assert!(results.windows(2).all(|pair| pair[0].id == pair[1].id));
    assert_eq!(repo.list_matches(&[a, b]).expect("should list").len(), 1);
}
