use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Serialize;

use crate::db::repository::Store;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: String) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details),
        }
    }

    fn error(details: String) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details),
        }
    }
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    health
        .services
        .insert("database".to_string(), check_store(state.store.as_ref()).await);
    health
        .services
        .insert("ai_provider".to_string(), check_provider(&state));

    if health.services.values().any(|s| s.status != "ok") {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_store(store: &dyn Store) -> ServiceStatus {
    match store.ping().await {
        Ok(()) => ServiceStatus::ok(format!("Connected to {} store", store.backend())),
        Err(e) => {
            error!("Store health check failed: {}", e);
            ServiceStatus::error(format!("Failed to reach {} store: {}", store.backend(), e))
        }
    }
}

fn check_provider(state: &AppState) -> ServiceStatus {
    match &state.provider_key_hint {
        Some(masked) => ServiceStatus::ok(format!("AI provider key configured ({})", masked)),
        None => ServiceStatus::error("OPENAI_API_KEY not configured".to_string()),
    }
}
