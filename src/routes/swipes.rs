use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::db::DbPool;
use crate::domain::types::SwipeId;
use crate::forms::listings::ListingIdsForm;
use crate::forms::swipes::{CreateSwipeForm, CreateSwipeFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{ApiResponse, authenticated_user, error_response, ok_response};
use crate::services::ServiceError;
use crate::services::swipes::{delete_swipe, list_swipes, submit_swipe};

#[post("/swipes")]
pub async fn api_v1_create_swipe(
    identity: Option<Identity>,
    form: web::Json<CreateSwipeForm>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let payload = match CreateSwipeFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match submit_swipe(payload, &user, &repo) {
        Ok(outcome) => HttpResponse::Created().json(ApiResponse { data: outcome }),
        Err(e) => error_response(e),
    }
}

#[get("/swipes")]
pub async fn api_v1_list_swipes(
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
    match list_swipes(listing_ids, &user, &repo) {
        Ok(partition) => ok_response(partition),
        Err(e) => error_response(e),
    }
}

#[delete("/swipes/{swipe_id}")]
pub async fn api_v1_delete_swipe(
    identity: Option<Identity>,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let raw = path.into_inner();
    let Ok(swipe_id) = SwipeId::new(raw) else {
        return error_response(ServiceError::NotFound(format!("Swipe #{raw} not found.")));
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match delete_swipe(swipe_id, &user, &repo) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}
