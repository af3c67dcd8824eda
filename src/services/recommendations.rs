//! Ranking of feasible, not yet exhausted candidates by tag overlap.

use std::collections::BTreeSet;

use crate::domain::types::{ListingId, TagName, TagSimilarity};
use crate::domain::user::AuthenticatedUser;
use crate::repository::{ListingReader, LocationReader, SwipeReader};

use super::listings::{feasible_listings_in_range, require_owned_listing};
use super::swipes::listings_filtered_by_swipes;
use super::{ServiceError, ServiceResult, storage_error};

/// Share of the reference tags that the target also carries.
///
/// Asymmetric: a reference without tags scores 0 against anything.
pub fn tag_similarity(reference: &BTreeSet<TagName>, target: &BTreeSet<TagName>) -> TagSimilarity {
    if reference.is_empty() {
        return TagSimilarity::NONE;
    }
    let shared = reference.intersection(target).count();
    let score = shared as f64 / reference.len() as f64;
    TagSimilarity::new(score).unwrap_or(TagSimilarity::NONE)
}

/// Tag similarity of `target` as seen from `reference`.
pub fn listing_tag_similarity<R>(
    repo: &R,
    reference: ListingId,
    target: ListingId,
) -> ServiceResult<TagSimilarity>
where
    R: ListingReader,
{
    let reference_listing = repo
        .get_listing_by_id(reference)
        .map_err(storage_error("Failed to get reference listing"))?;
    let target_listing = repo
        .get_listing_by_id(target)
        .map_err(storage_error("Failed to get target listing"))?;

    match (reference_listing, target_listing) {
        (Some(reference), Some(target)) => Ok(tag_similarity(&reference.tags, &target.tags)),
        (None, None) => Err(ServiceError::NotFound(format!(
            "Listings #{reference} and #{target} not found."
        ))),
        (None, Some(_)) => Err(ServiceError::NotFound(format!(
            "Listing #{reference} not found."
        ))),
        (Some(_), None) => Err(ServiceError::NotFound(format!(
            "Listing #{target} not found."
        ))),
    }
}

/// Ranked recommendations for a listing, best first.
///
/// Feasible candidates are pruned by the listing's earlier swipes and then
/// ordered by descending tag similarity; equal scores keep ascending id
/// order. An empty list means there is nothing to recommend.
pub fn listing_recommendations<R>(repo: &R, listing_id: ListingId) -> ServiceResult<Vec<ListingId>>
where
    R: ListingReader + LocationReader + SwipeReader,
{
    let feasible = feasible_listings_in_range(repo, listing_id)?;
    if feasible.is_empty() {
        return Ok(vec![]);
    }

    let candidate_ids: Vec<ListingId> = feasible.iter().map(|listing| listing.id).collect();
    let pruned = listings_filtered_by_swipes(repo, listing_id, &candidate_ids)?;
    if pruned.is_empty() {
        return Ok(vec![]);
    }

    let mut scored = pruned
        .into_iter()
        .map(|id| Ok((id, listing_tag_similarity(repo, listing_id, id)?)))
        .collect::<ServiceResult<Vec<_>>>()?;

    // Stable, so ties stay in ascending id order.
    scored.sort_by(|(_, a), (_, b)| b.get().total_cmp(&a.get()));

    Ok(scored.into_iter().map(|(id, _)| id).collect())
}

/// Recommendations for a listing owned by `user`, as raw ids.
pub fn recommendations_for_owner<R>(
    listing_id: ListingId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<i32>>
where
    R: ListingReader + LocationReader + SwipeReader,
{
    require_owned_listing(repo, listing_id, user)?;
    let ranked = listing_recommendations(repo, listing_id)?;
    log::debug!(
        "Listing #{listing_id} has {} recommendations",
        ranked.len()
    );
    Ok(ranked.into_iter().map(ListingId::get).collect())
}
