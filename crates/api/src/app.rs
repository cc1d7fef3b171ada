use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use persistence::Store;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, security_headers_middleware, trace_id,
};
use crate::routes::{
    auth, collaborators, dashboard, frontend, health, orders, qrcode, signature, templates,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, store: Store) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        store,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
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

    // Admin routes (require an admin session token)
    let admin_routes = Router::new()
        .route("/api/v1/admin/logout", post(auth::logout))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route("/api/v1/units", get(dashboard::list_units))
        .route(
            "/api/v1/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/api/v1/orders/bulk", post(orders::bulk_create_orders))
        .route("/api/v1/orders/form", post(orders::preview_order_form))
        .route(
            "/api/v1/orders/:order_id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route(
            "/api/v1/orders/:order_id/document",
            get(orders::order_document),
        )
        .route(
            "/api/v1/orders/:order_id/document.pdf",
            get(orders::order_document_pdf),
        )
        .route("/api/v1/orders/:order_id/qr", get(orders::order_qr))
        .route(
            "/api/v1/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/v1/templates/defaults",
            get(templates::default_template_fields),
        )
        .route(
            "/api/v1/templates/:template_id",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route(
            "/api/v1/collaborators",
            get(collaborators::search_collaborators),
        )
        .route(
            "/api/v1/collaborators/:cpf",
            get(collaborators::get_collaborator),
        )
        .route("/api/v1/qrcode", get(qrcode::qrcode_png))
        .route("/api/v1/qrcode/sheet", get(qrcode::qrcode_sheet))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Signer routes (identified by CPF only)
    let signer_routes = Router::new()
        .route("/api/v1/signature/:cpf", get(signature::get_signer_order))
        .route(
            "/api/v1/signature/:cpf/document",
            get(signature::get_signer_document),
        )
        .route("/api/v1/signature/:cpf/sign", post(signature::sign_order));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/admin/login", post(auth::login))
        .route("/metrics", get(metrics_handler));

    let mut router = Router::new()
        .merge(public_routes)
        .merge(signer_routes)
        .merge(admin_routes);

    if config.frontend.enabled {
        router = router.fallback(frontend::serve_frontend);
    }

    router
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
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
