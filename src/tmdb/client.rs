use std::time::Duration;

use tracing::{debug, error, info};

use super::types::{PopularQuery, SearchQuery};
use crate::config::TmdbConfig;

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("TMDB returned status {status}")]
    Status { status: u16, body: String },
    #[error("TMDB request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("TMDB response was not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Client for the two TMDB endpoints we relay. Holds the API key so it never
/// leaves the server.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(TmdbError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn popular_movies(
        &self,
        query: &PopularQuery,
        origin: Option<&str>,
    ) -> Result<serde_json::Value, TmdbError> {
        let url = self.popular_url(query);
        self.fetch_json("popular", &url, origin).await
    }

    pub async fn search_movies(
        &self,
        query: &SearchQuery,
        origin: Option<&str>,
    ) -> Result<serde_json::Value, TmdbError> {
        let url = self.search_url(query);
        self.fetch_json("search", &url, origin).await
    }

    fn popular_url(&self, query: &PopularQuery) -> String {
        format!(
            "{}/movie/popular?api_key={}&language={}&page={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&query.language),
            urlencoding::encode(&query.page),
        )
    }

    fn search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}/search/movie?api_key={}&language={}&query={}&page={}&include_adult={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&query.language),
            urlencoding::encode(&query.query),
            urlencoding::encode(&query.page),
            urlencoding::encode(&query.include_adult),
        )
    }

    async fn fetch_json(
        &self,
        kind: &str,
        url: &str,
        origin: Option<&str>,
    ) -> Result<serde_json::Value, TmdbError> {
        info!(
            kind,
            url = %redact_api_key(url),
            origin = origin.unwrap_or("unknown"),
            "Requesting TMDB"
        );

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(TmdbError::Transport)?;

        let status = response.status();
        info!(kind, status = %status, "TMDB response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(kind, status = status.as_u16(), body = %body, "TMDB error body");
            return Err(TmdbError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data = response
            .json::<serde_json::Value>()
            .await
            .map_err(TmdbError::Decode)?;
        debug!(kind, "TMDB response decoded");

        Ok(data)
    }
}

/// Replace the value of the `api_key` query parameter with `***`.
pub fn redact_api_key(url: &str) -> String {
    let Some(start) = url.find("api_key=").map(|i| i + "api_key=".len()) else {
        return url.to_string();
    };
    let end = url[start..]
        .find('&')
        .map(|i| start + i)
        .unwrap_or(url.len());
    format!("{}***{}", &url[..start], &url[end..])
}
