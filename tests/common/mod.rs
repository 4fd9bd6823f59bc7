#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{http::header, web, App};
use bson::oid::ObjectId;
use serde_json::{json, Value};

use journeygo_api::config::AppConfig;
use journeygo_api::db::{memory_store::MemoryStore, repository::Store};
use journeygo_api::middleware::auth::issue_token;
use journeygo_api::routes;
use journeygo_api::services::completion_client::OpenAiProvider;
use journeygo_api::services::recommendation_service::{RecommendationService, RetryPolicy};
use journeygo_api::state::AppState;

pub const TEST_SECRET: &str = "journeygo_test_secret";
pub const TEST_API_KEY: &str = "sk-test-1234567890";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Nothing listens here; requests fail at connect time.
pub const CLOSED_PROVIDER_URL: &str = "http://127.0.0.1:1";

pub struct TestApp {
    pub store: Arc<dyn Store>,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(CLOSED_PROVIDER_URL, Some(TEST_API_KEY))
    }

    pub fn with_provider(base_url: &str, api_key: Option<&str>) -> Self {
        let mut vars = HashMap::from([
            ("JWT_SECRET", TEST_SECRET.to_string()),
            ("OPENAI_BASE_URL", base_url.to_string()),
            ("AI_RETRY_DELAY_MS", "10".to_string()),
            ("RUST_ENV", "test".to_string()),
        ]);
        if let Some(key) = api_key {
            vars.insert("OPENAI_API_KEY", key.to_string());
        }
        let config = AppConfig::from_lookup(|name| vars.get(name).cloned())
            .expect("test configuration is valid");

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let provider = OpenAiProvider::new(&config.provider).expect("provider client builds");
        let recommendations = Arc::new(RecommendationService::new(
            Arc::new(provider),
            RetryPolicy::with_delay(config.provider.retry_delay),
        ));

        Self {
            store: store.clone(),
            state: web::Data::new(AppState::new(store, recommendations, &config)),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure(TEST_SECRET.to_string()))
    }
}

pub fn new_user_id() -> String {
    ObjectId::new().to_hex()
}

pub fn bearer_for(user_id: &str, email: &str) -> (header::HeaderName, String) {
    let token = issue_token(TEST_SECRET, email, user_id).expect("token is issued");
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Chat completion envelope whose message content is `reply` serialized.
pub fn completion_body(reply: &Value) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": reply.to_string() },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn sample_recommendation() -> Value {
    json!({
        "destination": "Yogyakarta",
        "duration": 3,
        "people": 2,
        "style": "standard",
        "itinerary": [
            { "day": 1, "activities": ["Borobudur sunrise", "Malioboro street food"] }
        ],
        "costBreakdown": {
            "transportation": 1500000,
            "accommodation": 2400000,
            "food": 900000,
            "activities": 700000,
            "total": 5500000
        },
        "tips": ["Book the sunrise tour a day ahead"]
    })
}

pub fn sample_suggestions() -> Value {
    json!({
        "suggestions": [
            {
                "destination": "Labuan Bajo",
                "estimatedCost": 9000000,
                "duration": 4,
                "reason": "Komodo island hopping",
                "highlights": ["Padar Island", "Pink Beach"]
            },
            {
                "destination": "Lombok",
                "estimatedCost": 6500000,
                "duration": 3,
                "reason": "Quieter beaches",
                "highlights": ["Gili Trawangan"]
            },
            {
                "destination": "Bandung",
                "estimatedCost": 2500000,
                "duration": 2,
                "reason": "Cool highlands",
                "highlights": ["Kawah Putih"]
            }
        ]
    })
}
