//! JSON API under `/api/v1`.

use actix_identity::Identity;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::domain::types::UserId;
use crate::domain::user::AuthenticatedUser;
use crate::services::ServiceError;

pub mod listings;
pub mod maps;
pub mod matches;
pub mod swipes;

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden => StatusCode::FORBIDDEN,
        ServiceError::Storage(_) | ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a service error as `{"error": ...}` with the matching status.
/// Storage details stay in the log.
pub fn error_response(error: ServiceError) -> HttpResponse {
    let status = status_for(&error);
    let message = match &error {
        ServiceError::Storage(_) | ServiceError::Internal => "Internal server error.".to_string(),
        other => other.to_string(),
    };
    HttpResponse::build(status).json(ApiError { error: message })
}

pub fn ok_response<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse { data })
}

/// Resolve the caller from the identity cookie set by the auth service.
/// The identity string is the numeric user id.
pub fn authenticated_user(identity: Option<Identity>) -> Result<AuthenticatedUser, ServiceError> {
    let identity = identity.ok_or(ServiceError::Unauthorized)?;
    let id = identity.id().map_err(|e| {
        log::warn!("Failed to read identity: {e}");
        ServiceError::Unauthorized
    })?;
    let user_id = id
        .parse::<i32>()
        .ok()
        .and_then(|value| UserId::new(value).ok())
        .ok_or_else(|| {
            log::warn!("Identity '{id}' is not a user id");
            ServiceError::Unauthorized
        })?;
    Ok(AuthenticatedUser::new(user_id))
}

/// Register every API route under the current scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .service(listings::api_v1_create_listing)
            .service(listings::api_v1_list_listings)
            .service(listings::api_v1_get_listing)
            .service(listings::api_v1_delete_listing)
            .service(listings::api_v1_recommendations)
            .service(listings::api_v1_similarity)
            .service(swipes::api_v1_create_swipe)
            .service(swipes::api_v1_list_swipes)
            .service(swipes::api_v1_delete_swipe)
            .service(matches::api_v1_list_matches)
            .service(matches::api_v1_delete_match)
            .service(maps::api_v1_locations),
    );
}
