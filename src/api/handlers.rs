use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;
use tracing::error;

use super::error::ApiError;
use crate::server::AppState;
use crate::tmdb::{PopularQuery, SearchQuery};
use crate::util::QueryParams;

const POPULAR_ERROR: &str = "Failed to fetch popular movies from TMDB";
const SEARCH_ERROR: &str = "Failed to fetch search results from TMDB";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

fn request_origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ORIGIN).and_then(|v| v.to_str().ok())
}

pub async fn popular_movies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = PopularQuery::from_params(&params, &state.config.tmdb.language);

    state
        .tmdb
        .popular_movies(&query, request_origin(&headers))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error fetching popular movies: {}", e);
            ApiError::from_tmdb(e, POPULAR_ERROR)
        })
}

pub async fn search_movies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = SearchQuery::from_params(&params, &state.config.tmdb.language)
        .ok_or(ApiError::MissingQuery)?;

    state
        .tmdb
        .search_movies(&query, request_origin(&headers))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error fetching search results: {}", e);
            ApiError::from_tmdb(e, SEARCH_ERROR)
        })
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        message: "Proxy server is running",
    })
}
