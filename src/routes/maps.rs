use actix_web::{Responder, get, web};

use crate::db::DbPool;
use crate::forms::locations::{LocationSearchForm, LocationSearchPayload};
use crate::repository::DieselRepository;
use crate::routes::{error_response, ok_response};
use crate::services::locations::search_locations;

/// `latlng` centers a radius search in metres; without it all locations are
/// paged through.
#[get("/maps/locations")]
pub async fn api_v1_locations(
    query: web::Query<LocationSearchForm>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let payload = match LocationSearchPayload::try_from(query.into_inner()) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match search_locations(payload, &repo) {
        Ok(locations) => ok_response(locations),
        Err(e) => error_response(e),
    }
}
