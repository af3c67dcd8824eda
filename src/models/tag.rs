use diesel::prelude::*;

/// Diesel model representing a row in the `tags` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tags)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
}

/// Row of the `listing_tags` association table.
#[derive(Debug, Clone, Copy, Insertable, Queryable)]
#[diesel(table_name = crate::schema::listing_tags)]
pub struct ListingTag {
    pub listing_id: i32,
    pub tag_id: i32,
}
