use actix_web::{web, HttpResponse};
use log::info;

use crate::models::recommendation::RecommendationRequest;
use crate::services::recommendation_service::RecommendationError;
use crate::state::AppState;

/*
    /api/ai-travel-recommendation
*/
pub async fn recommend(
    state: web::Data<AppState>,
    input: web::Json<RecommendationRequest>,
) -> Result<HttpResponse, RecommendationError> {
    let request = input.into_inner();
    info!(
        "AI {} request, style {}",
        request.request_type, request.style
    );

    let reply = state.recommendations.recommend(&request).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// Malformed bodies get the same `{error, retry}` envelope as upstream failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        RecommendationError::InvalidRequest(format!("Invalid request body: {}", err)).into()
    })
}
