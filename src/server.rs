use axum::{
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{Config, Environment};
use crate::tmdb::TmdbClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
}

impl AppState {
    pub fn new(config: Config, tmdb: TmdbClient) -> Self {
        Self {
            config: Arc::new(config),
            tmdb: Arc::new(tmdb),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/popular-movies", get(crate::api::popular_movies))
        .route("/api/search-movies", get(crate::api::search_movies))
        .route("/health", get(crate::api::health));

    let static_files = ServeDir::new(&state.config.appdir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(fallback_handler.into_service());

    api_routes
        .fallback_service(static_files)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Development allows every origin. Production only allows the configured
/// origins, for GET and POST, with credentials, echoing the requested headers.
pub fn cors_layer(config: &Config) -> CorsLayer {
    match config.environment {
        Environment::Development => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Environment::Production => {
            let origins: Vec<HeaderValue> = config
                .cors
                .allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    // Preflight for paths that have no route; the CORS layer adds the headers.
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
