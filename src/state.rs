use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::Store;
use crate::services::recommendation_service::RecommendationService;

/// Shared, read-only handles given to every handler through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub recommendations: Arc<RecommendationService>,
    pub jwt_secret: String,
    pub environment: String,
    pub provider_key_hint: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        recommendations: Arc<RecommendationService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            recommendations,
            jwt_secret: config.jwt_secret.clone(),
            environment: config.environment.clone(),
            provider_key_hint: config.provider.masked_api_key(),
        }
    }
}
