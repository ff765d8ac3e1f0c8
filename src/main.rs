use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_match::config::Settings;
use connect_match::core::Matcher;
use connect_match::routes::{self, matchmaking::AppState};
use connect_match::services::{
    ChannelEventLog, KeyValueStore, MatchEngine, MatchStore, MemoryStore, Pipeline, ProfileStore,
    RedisStore,
};

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST),
        )
        .content_type("application/json")
        .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Build the store backends for profiles and matches, each with its own TTL
async fn build_backends(
    settings: &Settings,
) -> std::io::Result<(Arc<dyn KeyValueStore>, Arc<dyn KeyValueStore>)> {
    let profile_ttl = Duration::from_secs(settings.matching.profile_ttl_secs);
    let match_ttl = Duration::from_secs(settings.matching.match_ttl_secs);

    match settings.store.backend.as_str() {
        "redis" => {
            let profiles = RedisStore::new(&settings.store.redis_url, profile_ttl)
                .await
                .map_err(|e| std::io::Error::other(format!("Redis connection error: {}", e)))?;
            let matches = RedisStore::new(&settings.store.redis_url, match_ttl)
                .await
                .map_err(|e| std::io::Error::other(format!("Redis connection error: {}", e)))?;

            info!("store backend: redis ({})", settings.store.redis_url);
            Ok((Arc::new(profiles), Arc::new(matches)))
        }
        _ => {
            info!("store backend: memory");
            Ok((
                Arc::new(MemoryStore::new(100_000, profile_ttl)),
                Arc::new(MemoryStore::new(100_000, match_ttl)),
            ))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting connect-match matchmaking service...");

    // Build stores and the engine
    let (profile_backend, match_backend) = build_backends(&settings).await?;

    let matcher = Matcher::new(
        settings.scoring.weights.clone().into(),
        settings.matching.min_score,
        settings.matching.max_matches,
    );
    info!(
        "matcher initialized (min_score: {}, max_matches: {}, dedup_pairs: {})",
        settings.matching.min_score, settings.matching.max_matches, settings.matching.dedup_pairs
    );

    let engine = Arc::new(MatchEngine::new(
        ProfileStore::new(profile_backend),
        MatchStore::new(match_backend),
        matcher,
        settings.matching.dedup_pairs,
    ));

    // Wire the event pipeline: one consumer task over the in-process log
    let (event_log, update_tx, mut match_rx) =
        ChannelEventLog::new(settings.events.channel_capacity);
    let pipeline = Pipeline::new(engine.clone(), Arc::new(event_log));

    tokio::spawn(async move {
        pipeline.run().await;
    });

    // Drain the outbound topic; a real deployment hands this receiver to
    // the downstream transport instead
    tokio::spawn(async move {
        while let Some(record) = match_rx.recv().await {
            info!(
                "match created: {} ({} <-> {}, score {:.3})",
                record.id, record.user_id_1, record.user_id_2, record.score
            );
        }
    });

    // Build application state
    let app_state = AppState {
        engine,
        profile_updates: update_tx,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
