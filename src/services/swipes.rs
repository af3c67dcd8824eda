//! Swipe recording, reciprocity detection and candidate pruning.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::domain::matches::Match;
use crate::domain::swipe::{NewSwipe, Swipe};
use crate::domain::types::{ListingId, SwipeId};
use crate::domain::user::AuthenticatedUser;
use crate::dto::swipes::{SwipeDto, SwipeOutcomeDto, SwipePartitionDto};
use crate::forms::swipes::CreateSwipeFormPayload;
use crate::repository::{
    ListingListQuery, ListingReader, MatchReader, MatchWriter, RepositoryError, SwipeListQuery,
    SwipeReader, SwipeWriter,
};

use super::listings::{listing_not_found, require_listing, require_owned_listing};
use super::matches::create_match;
use super::{ServiceError, ServiceResult, storage_error};

/// A stored swipe and the match it completed, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeOutcome {
    pub swipe: Swipe,
    pub matched: Option<Match>,
}

impl From<SwipeOutcome> for SwipeOutcomeDto {
    fn from(value: SwipeOutcome) -> Self {
        Self {
            swipe: value.swipe.into(),
            matched: value.matched.map(Into::into),
        }
    }
}

/// Record that `swiper` liked or passed on `target`.
///
/// A pair can be swiped once; repeating the swipe, with the same or the
/// other decision, is a `Conflict`. A like answered by an earlier like from
/// the target creates the match. The swipe is stored before the match is
/// attempted, so a failing match write never loses the swipe, and repeating
/// the like stores the missing match before reporting the conflict.
pub fn create_swipe<R>(
    repo: &R,
    swiper: ListingId,
    target: ListingId,
    is_like: bool,
) -> ServiceResult<SwipeOutcome>
where
    R: ListingReader + SwipeReader + SwipeWriter + MatchReader + MatchWriter,
{
    let new_swipe = NewSwipe::new(swiper, target, is_like, Utc::now().naive_utc())?;

    require_listing(repo, swiper)?;
    require_listing(repo, target)?;

    if let Some(existing) = repo
        .find_swipe(swiper, target)
        .map_err(storage_error("Failed to look up swipe"))?
    {
        if existing.is_like != is_like {
            return Err(ServiceError::Conflict(
                "Changing a swipe decision is not supported.".to_string(),
            ));
        }
        // A repeated like completes a match an earlier attempt failed to store.
        if is_like {
            match_if_reciprocated(repo, swiper, target)?;
        }
        return Err(ServiceError::Conflict(format!(
            "Listing #{swiper} already swiped on listing #{target}."
        )));
    }

    let swipe = match repo.create_swipe(&new_swipe) {
        Ok(swipe) => swipe,
        Err(RepositoryError::ConstraintViolation(_)) => {
            return Err(ServiceError::Conflict(format!(
                "Listing #{swiper} already swiped on listing #{target}."
            )));
        }
        Err(e) => return Err(storage_error("Failed to create swipe")(e)),
    };

    if !is_like {
        return Ok(SwipeOutcome {
            swipe,
            matched: None,
        });
    }

    let matched = match_if_reciprocated(repo, swiper, target)?;

    Ok(SwipeOutcome { swipe, matched })
}

/// Create the match for `swiper` and `target` when `target` liked `swiper`.
fn match_if_reciprocated<R>(
    repo: &R,
    swiper: ListingId,
    target: ListingId,
) -> ServiceResult<Option<Match>>
where
    R: SwipeReader + MatchReader + MatchWriter,
{
    let reciprocated = repo
        .find_swipe(target, swiper)
        .map_err(storage_error("Failed to look up reciprocal swipe"))?
        .is_some_and(|reciprocal| reciprocal.is_like);

    if reciprocated {
        create_match(repo, swiper, target).map(Some)
    } else {
        Ok(None)
    }
}

/// Swipe submitted by a user on behalf of one of their listings.
pub fn submit_swipe<R>(
    payload: CreateSwipeFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SwipeOutcomeDto>
where
    R: ListingReader + SwipeReader + SwipeWriter + MatchReader + MatchWriter,
{
    if payload.swiped_by_listing_id == payload.swiped_on_listing_id {
        return Err(ServiceError::InvalidArgument(
            "Cannot swipe on your own listing.".to_string(),
        ));
    }
    require_listing(repo, payload.swiped_on_listing_id)?;
    require_owned_listing(repo, payload.swiped_by_listing_id, user)?;

    let outcome = create_swipe(
        repo,
        payload.swiped_by_listing_id,
        payload.swiped_on_listing_id,
        payload.is_like,
    )?;
    Ok(outcome.into())
}

/// Prune recommendation candidates by what `by` already swiped.
///
/// Returns nothing when every candidate was liked, the passed candidates
/// when every candidate was swiped, and the unswiped candidates otherwise.
/// The result is ordered by listing id.
pub fn listings_filtered_by_swipes<R>(
    repo: &R,
    by: ListingId,
    on: &[ListingId],
) -> ServiceResult<Vec<ListingId>>
where
    R: ListingReader + SwipeReader,
{
    let mut requested = Vec::with_capacity(on.len() + 1);
    requested.push(by);
    requested.extend_from_slice(on);

    let existing: BTreeSet<ListingId> = repo
        .existing_listing_ids(&requested)
        .map_err(storage_error("Failed to check listing ids"))?
        .into_iter()
        .collect();
    if let Some(missing) = requested.iter().find(|id| !existing.contains(*id)) {
        return Err(listing_not_found(*missing));
    }

    let candidates: BTreeSet<ListingId> = on.iter().copied().collect();

    let swipes = repo
        .list_swipes(
            SwipeListQuery::default()
                .by(vec![by])
                .on(candidates.iter().copied().collect()),
        )
        .map_err(storage_error("Failed to list swipes"))?;

    let liked: BTreeSet<ListingId> = swipes
        .iter()
        .filter(|s| s.is_like)
        .map(|s| s.swiped_on_listing_id)
        .collect();
    let passed: BTreeSet<ListingId> = swipes
        .iter()
        .filter(|s| !s.is_like)
        .map(|s| s.swiped_on_listing_id)
        .collect();

    if candidates.is_subset(&liked) {
        return Ok(vec![]);
    }

    let swiped: BTreeSet<ListingId> = liked.union(&passed).copied().collect();
    if candidates.is_subset(&swiped) {
        return Ok(candidates.intersection(&passed).copied().collect());
    }

    Ok(candidates.difference(&swiped).copied().collect())
}

/// Delete a swipe made by one of the user's listings.
pub fn delete_swipe<R>(swipe_id: SwipeId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ListingReader + SwipeReader + SwipeWriter,
{
    let swipe = repo
        .get_swipe_by_id(swipe_id)
        .map_err(storage_error("Failed to get swipe"))?
        .ok_or_else(|| ServiceError::NotFound(format!("Swipe #{swipe_id} not found.")))?;

    require_owned_listing(repo, swipe.swiped_by_listing_id, user)?;

    repo.delete_swipe(swipe_id)
        .map_err(storage_error("Failed to delete swipe"))?;
    log::info!("User #{} deleted swipe #{swipe_id}", user.user_id);
    Ok(())
}

/// Outgoing and incoming swipes of the given listings, or of all the user's
/// listings when no ids are supplied.
pub fn list_swipes<R>(
    listing_ids: Option<Vec<ListingId>>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SwipePartitionDto>
where
    R: ListingReader + SwipeReader,
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
        return Ok(SwipePartitionDto {
            outgoing: vec![],
            incoming: vec![],
        });
    }

    let outgoing = repo
        .list_swipes(SwipeListQuery::default().by(listing_ids.clone()))
        .map_err(storage_error("Failed to list outgoing swipes"))?;
    let incoming = repo
        .list_swipes(SwipeListQuery::default().on(listing_ids))
        .map_err(storage_error("Failed to list incoming swipes"))?;

    Ok(SwipePartitionDto {
        outgoing: outgoing.into_iter().map(SwipeDto::from).collect(),
        incoming: incoming.into_iter().map(SwipeDto::from).collect(),
    })
}
