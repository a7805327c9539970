//! Agency Backend - library for app logic and testing

pub mod auth;
pub mod error;
pub mod logging;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use state::AppState;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to allowing local dev origins.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                "http://localhost:3000".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        // Public site
        .route("/api/contact", post(routes::contact::submit))
        .route("/api/blog-posts", get(routes::blog::list_published))
        .route("/api/blog-posts/{slug}", get(routes::blog::get_published))
        .route("/api/projects", get(routes::projects::list_public))
        .route("/api/ai-agents", get(routes::agents::list_public))
        .route("/api/services", get(routes::services::list_public))
        .route("/api/testimonials", get(routes::testimonials::list_public))
        .route("/api/settings/{key}", get(routes::settings::get_by_key))
        // Admin auth
        .route("/api/admin/login", post(routes::auth::login))
        .route("/api/admin/logout", post(routes::auth::logout))
        .route("/api/admin/me", get(routes::auth::me))
        // Admin back-office
        .route("/api/admin/stats", get(routes::stats::dashboard))
        .route("/api/admin/leads", get(routes::leads::list))
        .route(
            "/api/admin/leads/{id}",
            axum::routing::patch(routes::leads::update).delete(routes::leads::delete),
        )
        .route(
            "/api/admin/blog-posts",
            get(routes::blog::list_all).post(routes::blog::create),
        )
        .route(
            "/api/admin/blog-posts/{id}",
            get(routes::blog::get_by_id)
                .patch(routes::blog::update)
                .delete(routes::blog::delete),
        )
        .route(
            "/api/admin/projects",
            get(routes::projects::list_all).post(routes::projects::create),
        )
        .route(
            "/api/admin/projects/{id}",
            axum::routing::patch(routes::projects::update).delete(routes::projects::delete),
        )
        .route(
            "/api/admin/ai-agents",
            get(routes::agents::list_all).post(routes::agents::create),
        )
        .route(
            "/api/admin/ai-agents/{id}",
            axum::routing::patch(routes::agents::update).delete(routes::agents::delete),
        )
        .route(
            "/api/admin/services",
            get(routes::services::list_all).post(routes::services::create),
        )
        .route(
            "/api/admin/services/{id}",
            axum::routing::patch(routes::services::update).delete(routes::services::delete),
        )
        .route(
            "/api/admin/testimonials",
            get(routes::testimonials::list_all).post(routes::testimonials::create),
        )
        .route(
            "/api/admin/testimonials/{id}",
            axum::routing::patch(routes::testimonials::update)
                .delete(routes::testimonials::delete),
        )
        .route("/api/admin/settings", get(routes::settings::list_all))
        .route("/api/admin/settings/{key}", put(routes::settings::upsert))
        // Health
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        // Global 2 MB request body cap — prevents unbounded buffering
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
        .with_state(state)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    // Refuse to start in production with the insecure default admin password.
    let environment = std::env::var("ENVIRONMENT").unwrap_or_default();
    if environment == "production" {
        let password_set =
            std::env::var("ADMIN_HASH_PASSWORD").is_ok() || std::env::var("ADMIN_PASSWORD").is_ok();
        if !password_set {
            panic!(
                "FATAL: Neither ADMIN_HASH_PASSWORD nor ADMIN_PASSWORD is set. \
                 Refusing to start in production with the default admin password."
            );
        }
    }

    let state = AppState::new();

    if let Err(e) = seed::seed_admin(&state).await {
        tracing::error!("Failed to seed admin user: {}", e);
    }
    if std::env::var("SEED_DEMO_CONTENT")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
    {
        seed::seed_demo_content(&state).await;
    }

    let app = create_app(state);

    // Bind address is configurable via HOST / PORT env vars, defaulting to
    // 127.0.0.1:3001 so existing dev setups keep working unchanged.
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
