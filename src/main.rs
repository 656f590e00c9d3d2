use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use oddsmatch::config::Settings;
use oddsmatch::core::Analyzer;
use oddsmatch::routes::{self, analysis::{AppState, Variants}};
use oddsmatch::services::{CacheManager, InMemoryMatchStore, MatchRepository, PostgresMatchStore, ResultCache};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
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
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
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
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }

    info!("Starting Oddsmatch analysis service...");

    // Initialize record store
    let store: Arc<dyn MatchRepository> = match &settings.database.fixture_path {
        Some(path) => {
            let fixture = InMemoryMatchStore::from_json_file(path).unwrap_or_else(|e| {
                error!("Failed to load match fixture {}: {}", path, e);
                panic!("Fixture error: {}", e);
            });
            info!("Serving {} matches from fixture {}", fixture.len(), path);
            Arc::new(fixture)
        }
        None => {
            let db_max_conn = settings.database.max_connections.unwrap_or(10);
            let postgres = PostgresMatchStore::from_settings(
                &settings.database.url,
                Some(db_max_conn),
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            });
            info!("PostgreSQL record store initialized (max: {} connections)", db_max_conn);
            Arc::new(postgres)
        }
    };

    // Initialize result cache (optional - app works without it)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(3600);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache: Option<Arc<dyn ResultCache>> = if !settings.cache.enabled {
        info!("Result cache disabled");
        None
    } else {
        let manager = match &settings.cache.redis_url {
            Some(url) => match CacheManager::new(url, l1_cache_size, cache_ttl).await {
                Ok(c) => c,
                Err(e) => {
                    warn!("Failed to connect to Redis ({}), using in-process cache only", e);
                    CacheManager::in_memory(l1_cache_size, cache_ttl)
                }
            },
            None => CacheManager::in_memory(l1_cache_size, cache_ttl),
        };
        info!(
            "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
            l1_cache_size,
            manager.ttl_secs(),
            manager.has_redis()
        );
        let shared: Arc<dyn ResultCache> = Arc::new(manager);
        Some(shared)
    };

    let analyzer = Analyzer::new(settings.analysis.tolerance);
    let variants = Variants::with_limits(
        settings.analysis.success_rate_limit,
        settings.analysis.distribution_limit,
    );

    info!(
        "Analyzer initialized (tolerance: {}, limits: {}/{})",
        analyzer.tolerance(),
        settings.analysis.success_rate_limit,
        settings.analysis.distribution_limit
    );

    // Build application state
    let app_state = AppState {
        store,
        cache,
        cache_ttl_secs: cache_ttl,
        analyzer,
        variants,
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
