use actix_web::{web, HttpResponse};
use bson::oid::ObjectId;
use chrono::Utc;
use log::info;

use crate::db::repository::PlanRepository;
use crate::errors::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::plan::{NewTravelPlan, TravelPlan};
use crate::services::estimate_service::EstimateService;
use crate::state::AppState;

fn parse_plan_id(path: web::Path<String>) -> Result<String, ApiError> {
    let id = path.into_inner();
    ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid plan ID".to_string()))?;
    Ok(id)
}

async fn load_plan(state: &AppState, user: &AuthenticatedUser, plan_id: &str) -> Result<TravelPlan, ApiError> {
    state
        .store
        .find_plan(&user.user_id, plan_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to retrieve plan", e))?
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))
}

/*
    POST /api/plans
*/
pub async fn create(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    input: web::Json<NewTravelPlan>,
) -> Result<HttpResponse, ApiError> {
    let submission = input.into_inner();
    submission
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let plan = TravelPlan::from_submission(&user.user_id, submission, Utc::now());
    let plan = state
        .store
        .insert_plan(plan)
        .await
        .map_err(|e| ApiError::persistence("Failed to save plan", e))?;

    info!("Saved plan {} for user {}", plan.id, user.user_id);
    Ok(HttpResponse::Created().json(plan))
}

/*
    GET /api/plans
*/
pub async fn list(user: AuthenticatedUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let plans = state
        .store
        .list_plans(&user.user_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to load plans", e))?;
    Ok(HttpResponse::Ok().json(plans))
}

/*
    GET /api/plans/{id}
*/
pub async fn get_by_id(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = parse_plan_id(path)?;
    let plan = load_plan(&state, &user, &plan_id).await?;
    Ok(HttpResponse::Ok().json(plan))
}

/*
    DELETE /api/plans/{id}
*/
pub async fn delete(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = parse_plan_id(path)?;
    let deleted = state
        .store
        .delete_plan(&user.user_id, &plan_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to delete plan", e))?;

    if !deleted {
        return Err(ApiError::NotFound("Plan not found".to_string()));
    }

    info!("Deleted plan {} for user {}", plan_id, user.user_id);
    Ok(HttpResponse::NoContent().finish())
}

/*
    GET /api/plans/{id}/estimate
*/
pub async fn estimate(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = parse_plan_id(path)?;
    let plan = load_plan(&state, &user, &plan_id).await?;
    Ok(HttpResponse::Ok().json(EstimateService::estimate(&plan)))
}

/*
    GET /api/plans/compare
*/
pub async fn compare(user: AuthenticatedUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let plans = state
        .store
        .list_plans(&user.user_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to load plans", e))?;
    Ok(HttpResponse::Ok().json(EstimateService::compare(&plans)))
}
