pub mod account;
pub mod dashboard;
pub mod health;
pub mod offline;
pub mod plans;
pub mod profile;
pub mod recommendation;

use actix_cors::Cors;
use actix_web::{web, HttpResponse};

use crate::errors::{json_error_handler, ApiError};
use crate::middleware::auth::AuthMiddleware;

/// Registers every route. Handlers expect `web::Data<AppState>` to be set
/// on the app.
pub fn configure(secret: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health", web::get().to(health::health_check))
            .route("/service-worker.js", web::get().to(offline::service_worker))
            .service(
                web::scope("/api")
                    // Public routes
                    .service(
                        web::resource("/ai-travel-recommendation")
                            .app_data(recommendation::json_config())
                            .route(web::post().to(recommendation::recommend)),
                    )
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(account::signup))
                            .route("/signin", web::post().to(account::signin))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware::new(secret.clone()))
                                    .route("/session", web::get().to(account::user_session))
                                    .default_service(web::to(api_not_found)),
                            )
                            .default_service(web::to(api_not_found)),
                    )
                    // Protected routes
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::new(secret))
                            .route("/plans", web::get().to(plans::list))
                            .route("/plans", web::post().to(plans::create))
                            .route("/plans/compare", web::get().to(plans::compare))
                            .route("/plans/{id}", web::get().to(plans::get_by_id))
                            .route("/plans/{id}", web::delete().to(plans::delete))
                            .route("/plans/{id}/estimate", web::get().to(plans::estimate))
                            .route("/profile", web::get().to(profile::get))
                            .route("/profile", web::put().to(profile::upsert))
                            .route("/dashboard", web::get().to(dashboard::overview))
                            .default_service(web::to(api_not_found)),
                    )
                    .default_service(web::to(api_not_found)),
            );
    }
}

/// Unknown `/api` paths never reach the app-shell fallback.
async fn api_not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Not found".to_string()))
}

/// Browser clients call the API cross-origin, including the preflight.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allowed_headers(vec!["authorization", "x-client-info", "apikey", "content-type"])
        .max_age(3600)
}
