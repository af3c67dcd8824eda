use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::swipe::Swipe;
use crate::dto::matches::MatchDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeDto {
    pub id: i32,
    pub swiped_by_listing_id: i32,
    pub swiped_on_listing_id: i32,
    pub is_like: bool,
    pub swiped_at: NaiveDateTime,
}

impl From<Swipe> for SwipeDto {
    fn from(value: Swipe) -> Self {
        Self {
            id: value.id.get(),
            swiped_by_listing_id: value.swiped_by_listing_id.get(),
            swiped_on_listing_id: value.swiped_on_listing_id.get(),
            is_like: value.is_like,
            swiped_at: value.swiped_at,
        }
    }
}

/// Result of a swipe submission: the stored swipe and the match it
/// completed, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwipeOutcomeDto {
    pub swipe: SwipeDto,
    #[serde(rename = "match")]
    pub matched: Option<MatchDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwipePartitionDto {
    pub outgoing: Vec<SwipeDto>,
    pub incoming: Vec<SwipeDto>,
}
