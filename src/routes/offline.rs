use actix_web::{http::Method, http::StatusCode, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::services::offline_cache::{service_worker_script, CacheError, CacheShell};

/*
    GET /service-worker.js
*/
pub async fn service_worker() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript")
        .insert_header(("Cache-Control", "no-cache"))
        .body(service_worker_script())
}

/// App default service: cache-first app shell for paths no route matches.
/// Unmatched `/api` paths are answered inside the `/api` scope instead.
pub async fn app_shell(req: HttpRequest, shell: web::Data<CacheShell>) -> HttpResponse {
    if req.method() != Method::GET {
        return HttpResponse::NotFound().json(json!({ "error": "Not found" }));
    }

    match shell.respond(req.path()).await {
        Ok(cached) => {
            let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut response = HttpResponse::build(status);
            if let Some(content_type) = cached.content_type {
                response.content_type(content_type);
            }
            response.body(cached.body)
        }
        Err(CacheError::Unavailable(path)) => HttpResponse::ServiceUnavailable()
            .json(json!({ "error": format!("{} is not available offline", path) })),
        Err(e) => HttpResponse::BadGateway().json(json!({ "error": e.to_string() })),
    }
}
