mod config;
mod error;
mod routes;
mod state;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scour_appview=info".into()),
        )
        .init();

    let config = Config::from_env();
    info!(port = config.port, "Starting scour-appview");

    // Connect to database
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let state = AppState {
        pool,
        deletion_grace_hours: config.deletion_grace_hours,
    };

    // CORS
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET])
            .allow_headers([header::CONTENT_TYPE])
    };

    let app = Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Users
        .route("/api/user", get(routes::users::get_user))
        // Cached files
        .route("/api/file", get(routes::files::list_files))
        // Pending deletions
        .route("/api/deletions", get(routes::deletions::list_deletions))
        // Cache volumes
        .route("/api/volume", get(routes::volumes::list_volumes))
        // Eviction forecast
        .route("/api/predict", get(routes::predict::predict))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind");

    info!(port = config.port, "Listening");

    axum::serve(listener, app).await.expect("Server failed");
}
