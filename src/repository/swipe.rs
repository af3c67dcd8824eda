use diesel::prelude::*;

use crate::domain::swipe::{NewSwipe, Swipe};
use crate::domain::types::{ListingId, SwipeId};
use crate::models::swipe::{NewSwipe as DbNewSwipe, Swipe as DbSwipe};
use crate::repository::{
    DieselRepository, RepositoryResult, SwipeListQuery, SwipeReader, SwipeWriter,
};

impl SwipeReader for DieselRepository {
    fn get_swipe_by_id(&self, id: SwipeId) -> RepositoryResult<Option<Swipe>> {
        use crate::schema::swipes;

        let mut conn = self.conn()?;

        let swipe = swipes::table
            .filter(swipes::id.eq(id.get()))
            .select(DbSwipe::as_select())
            .first::<DbSwipe>(&mut conn)
            .optional()?;

        Ok(swipe.map(TryInto::try_into).transpose()?)
    }

    fn find_swipe(&self, by: ListingId, on: ListingId) -> RepositoryResult<Option<Swipe>> {
        use crate::schema::swipes;

        let mut conn = self.conn()?;

        let swipe = swipes::table
            .filter(swipes::swiped_by_listing_id.eq(by.get()))
            .filter(swipes::swiped_on_listing_id.eq(on.get()))
            .order(swipes::id.asc())
            .select(DbSwipe::as_select())
            .first::<DbSwipe>(&mut conn)
            .optional()?;

        Ok(swipe.map(TryInto::try_into).transpose()?)
    }

    fn list_swipes(&self, query: SwipeListQuery) -> RepositoryResult<Vec<Swipe>> {
        use crate::schema::swipes;

        let mut conn = self.conn()?;

        let mut items = swipes::table
            .select(DbSwipe::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(by) = &query.swiped_by {
            let by: Vec<i32> = by.iter().map(|id| id.get()).collect();
            items = items.filter(swipes::swiped_by_listing_id.eq_any(by));
        }

        if let Some(on) = &query.swiped_on {
            let on: Vec<i32> = on.iter().map(|id| id.get()).collect();
            items = items.filter(swipes::swiped_on_listing_id.eq_any(on));
        }

        let items = items
            .order(swipes::id.asc())
            .load::<DbSwipe>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Swipe>, _>>()?;

        Ok(items)
    }
}

impl SwipeWriter for DieselRepository {
    fn create_swipe(&self, swipe: &NewSwipe) -> RepositoryResult<Swipe> {
        use crate::schema::swipes;

        let mut conn = self.conn()?;
        let db_swipe: DbNewSwipe = swipe.into();

        let row = diesel::insert_into(swipes::table)
            .values(&db_swipe)
            .returning(DbSwipe::as_returning())
            .get_result::<DbSwipe>(&mut conn)?;

        Ok(Swipe::try_from(row)?)
    }

    fn delete_swipe(&self, id: SwipeId) -> RepositoryResult<usize> {
        use crate::schema::swipes;

        let mut conn = self.conn()?;

        let affected = diesel::delete(swipes::table.filter(swipes::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
