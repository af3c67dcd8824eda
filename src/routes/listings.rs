use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::db::DbPool;
use crate::domain::types::ListingId;
use crate::forms::listings::{CreateListingForm, CreateListingFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{authenticated_user, error_response, ok_response};
use crate::services::listings as listing_services;
use crate::services::recommendations::{listing_tag_similarity, recommendations_for_owner};
use crate::services::{ServiceError, ServiceResult};

fn listing_id(raw: i32) -> ServiceResult<ListingId> {
    ListingId::new(raw).map_err(|_| ServiceError::NotFound(format!("Listing #{raw} not found.")))
}

#[post("/listings")]
pub async fn api_v1_create_listing(
    identity: Option<Identity>,
    form: web::Json<CreateListingForm>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let payload = match CreateListingFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match listing_services::create_listing(payload, &user, &repo) {
        Ok(listing) => HttpResponse::Created().json(super::ApiResponse { data: listing }),
        Err(e) => error_response(e),
    }
}

#[get("/listings")]
pub async fn api_v1_list_listings(
    identity: Option<Identity>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match listing_services::list_user_listings(&user, &repo) {
        Ok(listings) => ok_response(listings),
        Err(e) => error_response(e),
    }
}

#[get("/listings/{listing_id}")]
pub async fn api_v1_get_listing(path: web::Path<i32>, pool: web::Data<DbPool>) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());
    match listing_id(path.into_inner()).and_then(|id| listing_services::get_listing(id, &repo)) {
        Ok(listing) => ok_response(listing),
        Err(e) => error_response(e),
    }
}

#[delete("/listings/{listing_id}")]
pub async fn api_v1_delete_listing(
    identity: Option<Identity>,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match listing_id(path.into_inner())
        .and_then(|id| listing_services::delete_listing(id, &user, &repo))
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

#[get("/listings/{listing_id}/recommendations")]
pub async fn api_v1_recommendations(
    identity: Option<Identity>,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    let user = match authenticated_user(identity) {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    let repo = DieselRepository::new(pool.get_ref().clone());
    match listing_id(path.into_inner()).and_then(|id| recommendations_for_owner(id, &user, &repo)) {
        Ok(ids) if ids.is_empty() => HttpResponse::NoContent().finish(),
        Ok(ids) => ok_response(ids),
        Err(e) => error_response(e),
    }
}

#[get("/listings/{reference_id}/similarity/{target_id}")]
pub async fn api_v1_similarity(
    identity: Option<Identity>,
    path: web::Path<(i32, i32)>,
    pool: web::Data<DbPool>,
) -> impl Responder {
    if let Err(e) = authenticated_user(identity) {
        return error_response(e);
    }

    let (reference, target) = path.into_inner();
    let repo = DieselRepository::new(pool.get_ref().clone());
    let result = listing_id(reference).and_then(|reference| {
        let target = listing_id(target)?;
        listing_tag_similarity(&repo, reference, target)
    });
    match result {
        Ok(similarity) => ok_response(similarity.get()),
        Err(e) => error_response(e),
    }
}
