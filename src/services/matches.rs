use chrono::Utc;

use crate::domain::matches::{Match, MatchKey, NewMatch};
use crate::domain::types::{ListingId, MatchId};
use crate::domain::user::AuthenticatedUser;
use crate::dto::matches::MatchDto;
use crate::repository::{ListingListQuery, ListingReader, MatchReader, MatchWriter};

use super::listings::require_owned_listing;
use super::{ServiceError, ServiceResult, storage_error};

/// Record a match between two listings, or return the one already stored.
///
/// The pair is canonicalized so argument order does not matter. Concurrent
/// calls for the same pair are resolved by the repository's unique key.
pub fn create_match<R>(repo: &R, a: ListingId, b: ListingId) -> ServiceResult<Match>
where
    R: MatchReader + MatchWriter,
{
    let key = MatchKey::new(a, b)?;

    if let Some(existing) = repo
        .get_match_by_key(key)
        .map_err(storage_error("Failed to look up match"))?
    {
        return Ok(existing);
    }

    let created = repo
        .create_match(&NewMatch {
            key,
            matched_on: Utc::now().naive_utc(),
        })
        .map_err(storage_error("Failed to create match"))?;

    log::info!(
        "Listings #{} and #{} matched (match #{})",
        created.listing1_id,
        created.listing2_id,
        created.id
    );
    Ok(created)
}

/// Matches of the given listings, or of all the user's listings when no ids
/// are supplied. Every supplied listing must belong to the user.
pub fn list_matches<R>(
    listing_ids: Option<Vec<ListingId>>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<MatchDto>>
where
    R: ListingReader + MatchReader,
{
    let listing_ids = match listing_ids {
        Some(ids) => {
            for id in &ids {
                require_owned_listing(repo, *id, user)?;
            }
            ids
        }
        None => repo
            .list_listings(ListingListQuery::default().user(user.user_id))
            .map_err(storage_error("Failed to list user listings"))?
            .into_iter()
            .map(|listing| listing.id)
            .collect(),
    };

    if listing_ids.is_empty() {
        return Ok(vec![]);
    }

    let matches = repo
        .list_matches(&listing_ids)
        .map_err(storage_error("Failed to list matches"))?;
    Ok(matches.into_iter().map(MatchDto::from).collect())
}

/// Delete a match. Owners of either listing may do so.
pub fn delete_match<R>(match_id: MatchId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ListingReader + MatchReader + MatchWriter,
{
    let stored = repo
        .get_match_by_id(match_id)
        .map_err(storage_error("Failed to get match"))?
        .ok_or_else(|| ServiceError::NotFound(format!("Match #{match_id} not found.")))?;

    let owns_side = [stored.listing1_id, stored.listing2_id]
        .into_iter()
        .map(|id| {
            repo.get_listing_by_id(id)
                .map_err(storage_error("Failed to get listing"))
        })
        .collect::<ServiceResult<Vec<_>>>()?
        .into_iter()
        .flatten()
        .any(|listing| listing.is_owned_by(user.user_id));
    if !owns_side {
        return Err(ServiceError::Forbidden);
    }

    repo.delete_match(match_id)
        .map_err(storage_error("Failed to delete match"))?;
    log::info!("User #{} deleted match #{match_id}", user.user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::listings::tests::{lid, listing, location, user};
    use crate::repository::test::TestRepository;

    fn repo() -> TestRepository {
        TestRepository::new(
            vec![location(1, 0.0, 0.0)],
            vec![
                listing(10, 1, 1, 10.0, &[]),
                listing(11, 1, 1, 10.0, &[]),
                listing(20, 2, 1, 10.0, &[]),
                listing(30, 3, 1, 10.0, &[]),
            ],
        )
    }

    #[test]
    fn create_match_is_idempotent_in_either_order() {
        let repo = repo();

        let first = create_match(&repo, lid(20), lid(10)).unwrap();
        let second = create_match(&repo, lid(10), lid(20)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.listing1_id, lid(10));
        assert_eq!(first.listing2_id, lid(20));
        assert_eq!(repo.match_count(), 1);
    }

    #[test]
    fn create_match_rejects_identical_listings() {
        assert!(matches!(
            create_match(&repo(), lid(10), lid(10)),
            Err(ServiceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn lists_matches_across_user_listings() {
        let repo = repo();
        create_match(&repo, lid(10), lid(20)).unwrap();
        create_match(&repo, lid(11), lid(30)).unwrap();
        create_match(&repo, lid(20), lid(30)).unwrap();

        assert_eq!(list_matches(None, &user(1), &repo).unwrap().len(), 2);

        let only_ten = list_matches(Some(vec![lid(10)]), &user(1), &repo).unwrap();
        assert_eq!(only_ten.len(), 1);
        assert_eq!(only_ten[0].listing2_id, 20);

        assert_eq!(
            list_matches(Some(vec![lid(20)]), &user(1), &repo).unwrap_err(),
            ServiceError::Forbidden
        );
        assert!(list_matches(None, &user(9), &repo).unwrap().is_empty());
    }

    #[test]
    fn either_party_may_delete_a_match() {
        let repo = repo();
        let first = create_match(&repo, lid(10), lid(20)).unwrap();
        let second = create_match(&repo, lid(11), lid(20)).unwrap();

        assert_eq!(
            delete_match(first.id, &user(3), &repo).unwrap_err(),
            ServiceError::Forbidden
        );
        delete_match(first.id, &user(1), &repo).unwrap();
        delete_match(second.id, &user(2), &repo).unwrap();
        assert_eq!(repo.match_count(), 0);
        assert!(matches!(
            delete_match(first.id, &user(1), &repo),
            Err(ServiceError::NotFound(_))
        ));
    }
}
