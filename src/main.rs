use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use journeygo_api::config::AppConfig;
use journeygo_api::db::{memory_store::MemoryStore, mongo_store::MongoStore, repository::Store};
use journeygo_api::routes;
use journeygo_api::services::completion_client::OpenAiProvider;
use journeygo_api::services::offline_cache::{CacheShell, CacheStorage, OriginFetcher};
use journeygo_api::services::recommendation_service::{RecommendationService, RetryPolicy};
use journeygo_api::state::AppState;

fn to_io<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> io::Error + '_ {
    move |e| io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

async fn build_store(config: &AppConfig) -> io::Result<Arc<dyn Store>> {
    match &config.mongodb_uri {
        Some(uri) => {
            let store = MongoStore::connect(uri, &config.database_name)
                .await
                .map_err(to_io("Failed to connect to MongoDB"))?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("MONGODB_URI not set, plans and profiles are kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn build_cache_shell(origin: &str) -> io::Result<web::Data<CacheShell>> {
    let fetcher = OriginFetcher::new(origin).map_err(to_io("Failed to build origin client"))?;
    let shell = CacheShell::new(Arc::new(CacheStorage::new()), Arc::new(fetcher));

    match shell.install().await {
        Ok(()) => info!("App shell cached from {}", origin),
        Err(e) => error!("App shell install failed: {}", e),
    }
    shell.activate().await;

    Ok(web::Data::new(shell))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(to_io("Invalid configuration"))?;
    info!("Starting JourneyGo API ({})", config.environment);

    let store = build_store(&config).await?;

    let provider = OpenAiProvider::new(&config.provider).map_err(to_io("Failed to build AI client"))?;
    let recommendations = Arc::new(RecommendationService::new(
        Arc::new(provider),
        RetryPolicy::with_delay(config.provider.retry_delay),
    ));
    if config.provider.api_key.is_none() {
        warn!("OPENAI_API_KEY not set, AI recommendations will fail");
    }

    let state = web::Data::new(AppState::new(store, recommendations, &config));

    let shell = match &config.static_origin {
        Some(origin) => Some(build_cache_shell(origin).await?),
        None => None,
    };

    let secret = config.jwt_secret.clone();
    info!("Binding to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        let mut app = App::new()
            .app_data(state.clone())
            .configure(routes::configure(secret.clone()));

        if let Some(shell) = &shell {
            app = app
                .app_data(shell.clone())
                .default_service(web::to(routes::offline::app_shell));
        }

        app.wrap(Logger::default()).wrap(routes::cors())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
