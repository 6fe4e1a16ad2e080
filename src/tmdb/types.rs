use serde::{Deserialize, Serialize};

use crate::util::QueryParams;

/// Parameters for `/movie/popular`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularQuery {
    pub language: String,
    pub page: String,
}

impl PopularQuery {
    pub fn from_params(params: &QueryParams, default_language: &str) -> Self {
        Self {
            language: params.get_or("language", default_language).to_string(),
            page: params.get_or("page", "1").to_string(),
        }
    }
}

/// Parameters for `/search/movie`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub language: String,
    pub page: String,
    pub include_adult: String,
}

impl SearchQuery {
    /// The search text is `query`, or `q` when `query` is missing or empty,
    /// trimmed after the choice. Returns `None` when that leaves nothing.
    pub fn from_params(params: &QueryParams, default_language: &str) -> Option<Self> {
        let query = params.first_of(&["query", "q"])?.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            query: query.to_string(),
            language: params.get_or("language", default_language).to_string(),
            page: params.get_or("page", "1").to_string(),
            include_adult: params.get_or("include_adult", "false").to_string(),
        })
    }
}
