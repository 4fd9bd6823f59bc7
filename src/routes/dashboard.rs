use actix_web::{web, HttpResponse};
use log::warn;
use serde::Serialize;

use crate::db::repository::ProfileRepository;
use crate::errors::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::{
    plan::TravelStyle,
    profile::display_name,
    recommendation::DestinationSuggestion,
};
use crate::state::AppState;

#[derive(Serialize)]
struct DashboardView {
    user_name: String,
    favorite_style: Option<TravelStyle>,
    suggestions: Vec<DestinationSuggestion>,
}

/*
    GET /api/dashboard
*/
pub async fn overview(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .store
        .find_profile(&user.user_id)
        .await
        .map_err(|e| ApiError::persistence("Failed to load profile", e))?;

    let favorite_style = profile.as_ref().and_then(|p| p.favorite_style);

    // The AI provider never takes the dashboard down.
    let suggestions = match favorite_style {
        Some(style) => state
            .recommendations
            .suggest(style)
            .await
            .unwrap_or_else(|e| {
                warn!("Dashboard suggestions unavailable: {}", e);
                Vec::new()
            }),
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(DashboardView {
        user_name: display_name(profile.as_ref(), &user.email),
        favorite_style,
        suggestions,
    }))
}
