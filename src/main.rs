use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::services::ServeDir;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use gallery_api::database::DatabaseManager;
use gallery_api::services::media;
use gallery_api::{config, handlers};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting gallery API in {:?} mode", config.environment);

    if let Err(e) = media::ensure_media_root().await {
        tracing::warn!(
            "Could not create media root {}: {}",
            config.storage.media_root.display(),
            e
        );
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("GALLERY_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Gallery API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let config = config::config();

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // API routes
        .merge(auth_routes())
        .merge(painting_routes())
        .merge(feedback_routes())
        // Uploaded images are served as plain static files
        .nest_service("/media", ServeDir::new(&config.storage.media_root))
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.api.max_upload_bytes))
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new().route("/api/auth/login", post(auth::login))
}

fn painting_routes() -> Router {
    use handlers::paintings;

    Router::new()
        // Collection operations; static paths take priority over :id
        .route("/api/paintings", get(paintings::list).post(paintings::create))
        .route("/api/paintings/count", get(paintings::count))
        .route("/api/paintings/pages/total", get(paintings::total_pages))
        .route("/api/paintings/tags/all", get(paintings::all_tags))
        // Record operations
        .route(
            "/api/paintings/:id",
            get(paintings::get)
                .put(paintings::update)
                .delete(paintings::remove),
        )
}

fn feedback_routes() -> Router {
    use axum::routing::post;
    use handlers::feedback;

    Router::new().route("/api/feedback", post(feedback::submit))
}

/// Origins come from configuration; "*" opts into a fully permissive policy.
fn cors_layer() -> CorsLayer {
    let security = &config::config().security;

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Gallery API",
        "version": version,
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/auth/login (public - token acquisition)",
            "paintings": "/api/paintings[/:id] (reads public, writes superuser)",
            "feedback": "/api/feedback (public)",
            "media": "/media/:filename (public)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
