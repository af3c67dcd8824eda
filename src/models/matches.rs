use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::matches::{Match as DomainMatch, NewMatch as DomainNewMatch};
use crate::domain::types::TypeConstraintError;

/// Diesel model representing a row in the `matches` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::matches)]
pub struct Match {
    pub id: i32,
    pub listing1_id: i32,
    pub listing2_id: i32,
    pub matched_on: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::matches)]
pub struct NewMatch {
    pub listing1_id: i32,
    pub listing2_id: i32,
    pub matched_on: NaiveDateTime,
}

impl TryFrom<Match> for DomainMatch {
    type Error = TypeConstraintError;

    fn try_from(row: Match) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.try_into()?,
            listing1_id: row.listing1_id.try_into()?,
            listing2_id: row.listing2_id.try_into()?,
            matched_on: row.matched_on,
        })
    }
}

impl From<&DomainNewMatch> for NewMatch {
    fn from(new_match: &DomainNewMatch) -> Self {
        Self {
            listing1_id: new_match.key.listing1_id().get(),
            listing2_id: new_match.key.listing2_id().get(),
            matched_on: new_match.matched_on,
        }
    }
}
