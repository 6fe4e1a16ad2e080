//! Shared helpers: a mock TMDB upstream and a router wired to it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use tmdb_proxy::config::Config;
use tmdb_proxy::server::{build_router, AppState};
use tmdb_proxy::tmdb::TmdbClient;

pub const API_KEY: &str = "test-key";

async fn mock_popular(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status_code": 7, "status_message": "Invalid API key" })),
        )
            .into_response();
    }

    Json(json!({
        "page": 1,
        "results": [{ "id": 550, "title": "Fight Club", "poster_path": "/fc.jpg" }],
        "echo": params,
    }))
    .into_response()
}

async fn mock_search(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("query").map(String::as_str) {
        Some("boom") => (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response(),
        Some("notjson") => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => Json(json!({
            "page": 1,
            "results": [],
            "echo": params,
        }))
        .into_response(),
    }
}

/// Start a mock TMDB API on an ephemeral port. Routes live under `/3`.
pub async fn start_mock_tmdb() -> SocketAddr {
    let app = Router::new()
        .route("/3/movie/popular", get(mock_popular))
        .route("/3/search/movie", get(mock_search));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A fresh static directory holding an `index.html`.
pub fn static_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tmdb-proxy-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Movies</h1>").unwrap();
    dir
}

pub fn test_config(upstream: SocketAddr, appdir: &Path) -> Config {
    let mut config = Config::default();
    config.tmdb.api_key = API_KEY.to_string();
    config.tmdb.base_url = format!("http://{}/3", upstream);
    config.appdir = appdir.to_string_lossy().to_string();
    config
}

pub fn router(config: Config) -> Router {
    let tmdb = TmdbClient::new(&config.tmdb).unwrap();
    build_router(AppState::new(config, tmdb))
}
