use diesel::prelude::*;

use crate::domain::matches::{Match, MatchKey, NewMatch};
use crate::domain::types::{ListingId, MatchId};
use crate::models::matches::{Match as DbMatch, NewMatch as DbNewMatch};
use crate::repository::{
    DieselRepository, MatchReader, MatchWriter, RepositoryError, RepositoryResult,
};

impl MatchReader for DieselRepository {
    fn get_match_by_id(&self, id: MatchId) -> RepositoryResult<Option<Match>> {
        use crate::schema::matches;

        let mut conn = self.conn()?;

        let row = matches::table
            .filter(matches::id.eq(id.get()))
            .select(DbMatch::as_select())
            .first::<DbMatch>(&mut conn)
            .optional()?;

        Ok(row.map(TryInto::try_into).transpose()?)
    }

    fn get_match_by_key(&self, key: MatchKey) -> RepositoryResult<Option<Match>> {
        use crate::schema::matches;

        let mut conn = self.conn()?;

        let row = matches::table
            .filter(matches::listing1_id.eq(key.listing1_id().get()))
            .filter(matches::listing2_id.eq(key.listing2_id().get()))
            .select(DbMatch::as_select())
            .first::<DbMatch>(&mut conn)
            .optional()?;

        Ok(row.map(TryInto::try_into).transpose()?)
    }

    fn list_matches(&self, listing_ids: &[ListingId]) -> RepositoryResult<Vec<Match>> {
        use crate::schema::matches;

        let mut conn = self.conn()?;
        let ids: Vec<i32> = listing_ids.iter().map(|id| id.get()).collect();

        let items = matches::table
            .filter(
                matches::listing1_id
                    .eq_any(ids.clone())
                    .or(matches::listing2_id.eq_any(ids)),
            )
            .order(matches::id.asc())
            .select(DbMatch::as_select())
            .load::<DbMatch>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Match>, _>>()?;

        Ok(items)
    }
}

impl MatchWriter for DieselRepository {
    fn create_match(&self, new_match: &NewMatch) -> RepositoryResult<Match> {
        use crate::schema::matches;

        let mut conn = self.conn()?;
        let db_match: DbNewMatch = new_match.into();

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            // The unique (listing1_id, listing2_id) index settles concurrent
            // inserts; the loser reads the winner's row.
            diesel::insert_into(matches::table)
                .values(&db_match)
                .on_conflict((matches::listing1_id, matches::listing2_id))
                .do_nothing()
                .execute(conn)?;

            Ok(matches::table
                .filter(matches::listing1_id.eq(db_match.listing1_id))
                .filter(matches::listing2_id.eq(db_match.listing2_id))
                .select(DbMatch::as_select())
                .first::<DbMatch>(conn)?)
        })?;

        Ok(Match::try_from(row)?)
    }

    fn delete_match(&self, id: MatchId) -> RepositoryResult<usize> {
        use crate::schema::matches;

        let mut conn = self.conn()?;

        let affected = diesel::delete(matches::table.filter(matches::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
