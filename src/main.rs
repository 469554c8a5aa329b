use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordspy::{abuse, api, config::ServerConfig, state::AppState, wordlist::WordListStore, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordspy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wordspy...");

    let config = ServerConfig::from_env();
    let abuse_config = Arc::new(abuse::AbuseConfig::from_env());

    let words = Arc::new(WordListStore::load(&config.wordlist_file).await);
    let port = config.port;
    let cors = cors_layer(&config);
    let state = Arc::new(AppState::new(words, config));

    // Spawn background task for pruning stale rate limiter windows
    abuse::spawn_cleanup(abuse_config.clone());

    // Word list REST routes, behind the rate limiter
    let list_routes = Router::new()
        .route("/wordlists", get(api::list_names).post(api::create_list))
        .route(
            "/wordlists/{name}",
            get(api::list_items).delete(api::delete_list),
        )
        .route(
            "/wordlists/{name}/items",
            post(api::add_item).delete(api::remove_item),
        )
        .layer(middleware::from_fn_with_state(
            abuse_config.clone(),
            abuse::rate_limit_middleware,
        ));

    let app = Router::new()
        .route(
            "/ws",
            get(ws::ws_handler).layer(middleware::from_fn_with_state(
                abuse_config.clone(),
                abuse::rate_limit_middleware,
            )),
        )
        .route("/health", get(api::health))
        .merge(list_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
