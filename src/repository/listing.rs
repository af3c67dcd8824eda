use std::collections::HashMap;

use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::listing::{Listing, NewListing};
use crate::domain::types::ListingId;
use crate::models::listing::{Listing as DbListing, NewListing as DbNewListing};
use crate::models::tag::{ListingTag, NewTag};
use crate::repository::{
    DieselRepository, ListingListQuery, ListingReader, ListingWriter, RepositoryError,
    RepositoryResult,
};

/// Attach tag names to listing rows with a single extra query.
fn with_tags(conn: &mut DbConnection, rows: Vec<DbListing>) -> RepositoryResult<Vec<Listing>> {
    use crate::schema::{listing_tags, tags};

    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

    let pairs: Vec<(i32, String)> = listing_tags::table
        .inner_join(tags::table)
        .filter(listing_tags::listing_id.eq_any(ids))
        .select((listing_tags::listing_id, tags::name))
        .load(conn)?;

    let mut tags_by_listing: HashMap<i32, Vec<String>> = HashMap::new();
    for (listing_id, name) in pairs {
        tags_by_listing.entry(listing_id).or_default().push(name);
    }

    let listings = rows
        .into_iter()
        .map(|row| {
            let tags = tags_by_listing.remove(&row.id).unwrap_or_default();
            Listing::try_from((row, tags))
        })
        .collect::<Result<Vec<Listing>, _>>()?;

    Ok(listings)
}

impl ListingReader for DieselRepository {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let row = listings::table
            .filter(listings::id.eq(id.get()))
            .select(DbListing::as_select())
            .first::<DbListing>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(with_tags(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<Vec<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let mut items = listings::table
            .select(DbListing::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(user_id) = query.user_id {
            items = items.filter(listings::user_id.eq(user_id.get()));
        }

        if let Some(location_ids) = &query.location_ids {
            let location_ids: Vec<i32> = location_ids.iter().map(|id| id.get()).collect();
            items = items.filter(listings::location_id.eq_any(location_ids));
        }

        if let Some(ids) = &query.ids {
            let ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
            items = items.filter(listings::id.eq_any(ids));
        }

        let rows = items
            .order(listings::id.asc())
            .load::<DbListing>(&mut conn)?;

        with_tags(&mut conn, rows)
    }

    fn existing_listing_ids(&self, ids: &[ListingId]) -> RepositoryResult<Vec<ListingId>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let found: Vec<i32> = listings::table
            .filter(listings::id.eq_any(ids))
            .select(listings::id)
            .order(listings::id.asc())
            .load(&mut conn)?;

        Ok(found
            .into_iter()
            .map(ListingId::new)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ListingWriter for DieselRepository {
    fn create_listing(&self, listing: &NewListing) -> RepositoryResult<Listing> {
        use crate::schema::{listing_tags, listings, tags};

        let mut conn = self.conn()?;
        let db_listing: DbNewListing = listing.into();

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(listings::table)
                .values(&db_listing)
                .returning(DbListing::as_returning())
                .get_result::<DbListing>(conn)?;

            for tag in &listing.tags {
                diesel::insert_into(tags::table)
                    .values(NewTag {
                        name: tag.as_str(),
                    })
                    .on_conflict(tags::name)
                    .do_nothing()
                    .execute(conn)?;

                let tag_id: i32 = tags::table
                    .filter(tags::name.eq(tag.as_str()))
                    .select(tags::id)
                    .first(conn)?;

                diesel::insert_into(listing_tags::table)
                    .values(ListingTag {
                        listing_id: row.id,
                        tag_id,
                    })
                    .execute(conn)?;
            }

            Ok(row)
        })?;

        with_tags(&mut conn, vec![row])?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    fn delete_listing(&self, id: ListingId) -> RepositoryResult<usize> {
        use crate::schema::{listing_tags, listings, matches, swipes};

        let mut conn = self.conn()?;

        // Dependent rows go first so this does not rely on `PRAGMA foreign_keys`.
        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(
                swipes::table.filter(
                    swipes::swiped_by_listing_id
                        .eq(id.get())
                        .or(swipes::swiped_on_listing_id.eq(id.get())),
                ),
            )
            .execute(conn)?;

            diesel::delete(
                matches::table.filter(
                    matches::listing1_id
                        .eq(id.get())
                        .or(matches::listing2_id.eq(id.get())),
                ),
            )
            .execute(conn)?;

            diesel::delete(listing_tags::table.filter(listing_tags::listing_id.eq(id.get())))
                .execute(conn)?;

            Ok(diesel::delete(listings::table.filter(listings::id.eq(id.get()))).execute(conn)?)
        })?;

        Ok(affected)
    }
}
