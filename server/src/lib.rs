pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod stream;

use std::{sync::Arc, time::Instant};

use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers::{health_check, metrics_endpoint, not_found};
use crate::metrics::AppMetrics;
use crate::stream::stream_endpoint;

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub metrics: AppMetrics,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            metrics: AppMetrics::new(),
            started_at: Instant::now(),
        }
    }
}

/// Build the full router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let config = &state.config;

    let public_api = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/stream", post(stream_endpoint));

    // Metrics endpoint - consider adding authentication in production
    let metrics_api = Router::new().route("/metrics", get(metrics_endpoint));

    let api = Router::new().merge(public_api).merge(metrics_api);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .into_inner();

    let router = Router::new()
        .merge(api.clone()) // root paths
        .nest("/api", api) // /api prefix
        .fallback(not_found)
        .layer(axum::middleware::from_fn(add_request_id))
        .layer(middleware_stack);

    with_rate_limit(router, config.rate_limit_per_minute).with_state(state)
}

/// Permissive unless `CORS_ALLOWED_ORIGINS` narrows the origin list.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let permissive = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_credentials(false);

    let Some(allowed_origins) = config.cors_allowed_origins.as_ref() else {
        warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (development mode)");
        return permissive;
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS is empty, falling back to permissive CORS");
        return permissive;
    }

    info!("CORS configured for {} origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
}

// Global limit: every request shares one bucket, which also behaves behind proxies
fn with_rate_limit(router: Router<AppState>, per_minute: u32) -> Router<AppState> {
    if per_minute == 0 {
        info!("Rate limiting disabled");
        return router;
    }

    let replenish_ms = (60_000 / u64::from(per_minute)).max(1);
    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(per_minute)
        .key_extractor(GlobalKeyExtractor)
        .finish()
    else {
        warn!("Invalid rate limit configuration, rate limiting disabled");
        return router;
    };

    info!("Rate limiting: {} requests per minute", per_minute);
    router.layer(GovernorLayer::new(Arc::new(governor_conf)))
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = header_value.clone() {
        request.headers_mut().insert("x-request-id", value);
    }
    let mut response = next.run(request).await;
    if let Some(value) = header_value {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
