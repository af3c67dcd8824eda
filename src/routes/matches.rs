use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, delete, get, web};

use crate::db::DbPool;
use crate::domain::types::MatchId;
use crate::forms::listings::ListingIdsForm;
use crate::repository::DieselRepository;
use crate::routes::{authenticated_user, error_response, ok_response};
use crate::services::ServiceError;
use crate::services::matches::{delete_match, list_matches};

#[get("/matches")]
pub async fn api_v1_list_matches(
    identity: Option<Identity>,
    query: web::Query<ListingIdsForm>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let listing_ids = match query.parse() {
        Ok(ids) => ids,
        Err(e) => return error_response(e.into()),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match list_matches(listing_ids, &user, &repo) {
        Ok(matches) => ok_response(matches),
        Err(e) => error_response(e),
    }
}

#[delete("/matches/{match_id}")]
pub async fn api_v1_delete_match(
    identity: Option<Identity>,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let raw = path.into_inner();
    let Ok(match_id) = MatchId::new(raw) else {
        return error_response(ServiceError::NotFound(format!("Match #{raw} not found.")));
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match delete_match(match_id, &user, &repo) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}
