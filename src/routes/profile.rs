use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::repository::ProfileRepository;
use crate::errors::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::profile::ProfileUpdate;
use crate::state::AppState;

/*
    GET /api/profile
*/
pub async fn get(user: AuthenticatedUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let profile = state
        .store
        .find_profile(&user.user_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to load profile", e))?;
    Ok(HttpResponse::Ok().json(profile))
}

/*
    PUT /api/profile
*/
pub async fn upsert(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    input: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    let profile = input.into_inner().into_profile(&user.user_id, Utc::now());
    let profile = state
        .store
        .upsert_profile(profile)
        .await
        .map_err(|e| ApiError::persistence("Failed to save profile", e))?;
    Ok(HttpResponse::Ok().json(profile))
}
