use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::controller::ViewController;
use domain::store::{PageStore, SettingsStore};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, security_headers_middleware, trace_id,
};
use crate::routes::{explore, health, pages, render, settings};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PageStore>,
    pub settings_store: Arc<dyn SettingsStore>,
    pub controller: Arc<ViewController>,
    pub config: Arc<Config>,
}

pub fn create_app(
    config: Config,
    store: Arc<dyn PageStore>,
    settings_store: Arc<dyn SettingsStore>,
) -> Router {
    let config = Arc::new(config);

    crate::middleware::metrics::init_metrics();

    let controller = Arc::new(ViewController::new(
        store.clone(),
        settings_store.clone(),
        Duration::from_millis(config.renderer.lookup_timeout_ms),
        Duration::from_millis(config.renderer.settings_timeout_ms),
    ));

    let state = AppState {
        store,
        settings_store,
        controller,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Admin routes (require the admin bearer token)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/pages",
            post(pages::create_page).get(pages::list_owner_pages),
        )
        .route(
            "/api/v1/admin/pages/:page_id",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route(
            "/api/v1/admin/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/pages", get(explore::list_published_pages))
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    // The renderer surface. The slug route is registered last so every
    // reserved route above wins; the write-time denylist keeps page slugs
    // from colliding with them in the first place.
    let render_routes = Router::new()
        .route("/", get(render::index))
        .route("/explore", get(explore::explore_html))
        .route("/:slug", get(render::render_page));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(render_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
