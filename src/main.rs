use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod api;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, POSTHOLE_* etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("Starting Post Hole in {:?} mode", config.environment);

    // Create the items table on a fresh database. A failure here is not
    // fatal: the server still comes up and /health reports the outage.
    if let Err(e) = crate::database::DatabaseManager::ensure_schema().await {
        tracing::warn!("Could not prepare database schema: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("POSTHOLE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🕳️  Post Hole listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let api = &config::config().api;

    let mut router = Router::new().route("/", get(root)).route("/health", get(health));

    // Route groups are mounted only when enabled in config
    if api.items_enabled {
        router = router.merge(items_routes());
    }
    if api.models_enabled {
        router = router.merge(models_routes());
    }
    if api.forms_enabled {
        router = router.merge(forms_routes());
    }
    if api.docs_enabled {
        router = router.merge(docs_routes());
    }

    router
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn items_routes() -> Router {
    use axum::routing::post;
    use handlers::items;

    Router::new()
        // Root POST creates an item; the banner stays on GET
        .route("/", post(items::create_item))
        .route("/items", get(items::list_items))
        .route(
            "/item/:item_id",
            get(items::read_item)
                .put(items::replace_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
}

fn models_routes() -> Router {
    use axum::routing::post;
    use handlers::models;

    Router::new()
        // The static /model/list segment wins over the :model_name capture
        .route("/model/list", get(models::model_list))
        .route("/model/:model_name", get(models::model_items).post(models::model_create))
}

fn forms_routes() -> Router {
    use axum::routing::post;
    use handlers::forms;

    Router::new().route("/form/:model_name", post(forms::create_from_form))
}

fn docs_routes() -> Router {
    use handlers::docs;

    let site = &config::config().site;
    Router::new()
        .route(&site.openapi_url, get(docs::openapi_json))
        .route(&site.docs_url, get(docs::swagger_ui))
        .route(&site.redoc_url, get(docs::redoc))
}

async fn root() -> axum::response::Json<Value> {
    let config = crate::config::config();
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": config.site.title,
            "version": version,
            "description": config.site.description,
            "endpoints": {
                "home": "GET /",
                "health": "GET /health",
                "create": "POST /",
                "items": "GET /items, GET|PUT|PATCH|DELETE /item/:item_id",
                "models": "GET /model/list, GET|POST /model/:model_name",
                "forms": "POST /form/:model_name",
                "docs": [config.site.docs_url, config.site.redoc_url, config.site.openapi_url],
            }
        }
    }))
}

async fn health() -> middleware::ApiResult<Value> {
    if let Err(e) = crate::database::DatabaseManager::health_check().await {
        tracing::error!("Health check failed: {}", e);
        return Err(error::ApiError::service_unavailable("database unavailable"));
    }

    Ok(middleware::ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
