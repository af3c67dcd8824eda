use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::geo::BoundingBox;
use crate::domain::location::{Location, NewLocation};
use crate::domain::types::{Latitude, LocationId, LocationName, Longitude};
use crate::models::location::{Location as DbLocation, NewLocation as DbNewLocation};
use crate::pagination::Pagination;
use crate::repository::{
    DieselRepository, LocationReader, LocationWriter, RepositoryError, RepositoryResult,
};

/// The row stored under a (latitude, longitude, name) identity, if any.
fn find_by_identity(
    conn: &mut DbConnection,
    latitude: f64,
    longitude: f64,
    name: Option<&str>,
) -> QueryResult<Option<DbLocation>> {
    use crate::schema::locations;

    let mut query = locations::table
        .select(DbLocation::as_select())
        .filter(locations::latitude.eq(latitude))
        .filter(locations::longitude.eq(longitude))
        .into_boxed::<diesel::sqlite::Sqlite>();

    query = match name {
        Some(name) => query.filter(locations::name.eq(name.to_string())),
        None => query.filter(locations::name.is_null()),
    };

    query
        .order(locations::id.asc())
        .first::<DbLocation>(conn)
        .optional()
}

fn into_domain(rows: Vec<DbLocation>) -> RepositoryResult<Vec<Location>> {
    Ok(rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Location>, _>>()?)
}

impl LocationReader for DieselRepository {
    fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let location = locations::table
            .filter(locations::id.eq(id.get()))
            .select(DbLocation::as_select())
            .first::<DbLocation>(&mut conn)
            .optional()?;

        Ok(location.map(TryInto::try_into).transpose()?)
    }

    fn list_locations_by_ids(&self, ids: &[LocationId]) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let rows = locations::table
            .filter(locations::id.eq_any(ids))
            .order(locations::id.asc())
            .select(DbLocation::as_select())
            .load::<DbLocation>(&mut conn)?;

        into_domain(rows)
    }

    fn find_location(
        &self,
        latitude: Latitude,
        longitude: Longitude,
        name: Option<&LocationName>,
    ) -> RepositoryResult<Option<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let location = find_by_identity(
            &mut conn,
            latitude.get(),
            longitude.get(),
            name.map(LocationName::as_str),
        )?;

        Ok(location.map(TryInto::try_into).transpose()?)
    }

    fn list_locations_at(
        &self,
        latitude: Latitude,
        longitude: Longitude,
    ) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let rows = locations::table
            .filter(locations::latitude.eq(latitude.get()))
            .filter(locations::longitude.eq(longitude.get()))
            .order(locations::id.asc())
            .select(DbLocation::as_select())
            .load::<DbLocation>(&mut conn)?;

        into_domain(rows)
    }

    fn list_locations_in_box(&self, bbox: &BoundingBox) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let mut rows: Vec<DbLocation> = Vec::new();

        // One query per longitude range; split ranges never overlap.
        for range in &bbox.lon_ranges {
            let mut chunk = locations::table
                .filter(locations::latitude.between(bbox.lat_min, bbox.lat_max))
                .filter(locations::longitude.between(range.min, range.max))
                .order(locations::id.asc())
                .select(DbLocation::as_select())
                .load::<DbLocation>(&mut conn)?;
            rows.append(&mut chunk);
        }

        into_domain(rows)
    }

    fn list_locations(&self, pagination: Pagination) -> RepositoryResult<(usize, Vec<Location>)> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let total = locations::table
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let rows = locations::table
            .order(locations::id.asc())
            .offset(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
            .limit(i64::try_from(pagination.per_page).unwrap_or(i64::MAX))
            .select(DbLocation::as_select())
            .load::<DbLocation>(&mut conn)?;

        Ok((total, into_domain(rows)?))
    }
}

impl LocationWriter for DieselRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let db_location: DbNewLocation = location.into();

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            // The unique identity index settles concurrent inserts; the loser
            // reads the winner's row.
            diesel::insert_into(locations::table)
                .values(&db_location)
                .on_conflict_do_nothing()
                .execute(conn)?;

            find_by_identity(
                conn,
                db_location.latitude,
                db_location.longitude,
                db_location.name,
            )?
            .ok_or(RepositoryError::NotFound)
        })?;

        Ok(Location::try_from(row)?)
    }
}
