use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::swipe::{NewSwipe as DomainNewSwipe, Swipe as DomainSwipe};
use crate::domain::types::TypeConstraintError;

/// Diesel model representing a row in the `swipes` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::swipes)]
pub struct Swipe {
    pub id: i32,
    pub swiped_by_listing_id: i32,
    pub swiped_on_listing_id: i32,
    pub is_like: bool,
    pub swiped_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::swipes)]
pub struct NewSwipe {
    pub swiped_by_listing_id: i32,
    pub swiped_on_listing_id: i32,
    pub is_like: bool,
    pub swiped_at: NaiveDateTime,
}

impl TryFrom<Swipe> for DomainSwipe {
    type Error = TypeConstraintError;

    fn try_from(swipe: Swipe) -> Result<Self, Self::Error> {
        Ok(Self {
            id: swipe.id.try_into()?,
            swiped_by_listing_id: swipe.swiped_by_listing_id.try_into()?,
            swiped_on_listing_id: swipe.swiped_on_listing_id.try_into()?,
            is_like: swipe.is_like,
            swiped_at: swipe.swiped_at,
        })
    }
}

impl From<&DomainNewSwipe> for NewSwipe {
    fn from(swipe: &DomainNewSwipe) -> Self {
        Self {
            swiped_by_listing_id: swipe.swiped_by_listing_id.get(),
            swiped_on_listing_id: swipe.swiped_on_listing_id.get(),
            is_like: swipe.is_like,
            swiped_at: swipe.swiped_at,
        }
    }
}
