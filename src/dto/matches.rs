use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::matches::Match;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub match_id: i32,
    pub listing1_id: i32,
    pub listing2_id: i32,
    pub matched_on: NaiveDateTime,
}

impl From<Match> for MatchDto {
    fn from(value: Match) -> Self {
        Self {
            match_id: value.id.get(),
            listing1_id: value.listing1_id.get(),
            listing2_id: value.listing2_id.get(),
            matched_on: value.matched_on,
        }
    }
}
