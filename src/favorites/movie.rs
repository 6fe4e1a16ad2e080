use serde::{Deserialize, Serialize};

/// A movie as the browser sees it: either a TMDB result (with `poster_path`)
/// or an entry read back from the favorites list (with `poster`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieCandidate {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// One record of the stored favorites list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoriteMovie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
}

impl From<&FavoriteMovie> for MovieCandidate {
    fn from(fav: &FavoriteMovie) -> Self {
        MovieCandidate {
            id: fav.id,
            title: fav.title.clone(),
            poster: fav.poster.clone(),
            poster_path: None,
            overview: fav.overview.clone(),
            release_date: fav.release_date.clone(),
            vote_average: fav.vote_average,
        }
    }
}

/// Resolve the poster to show: an explicit `poster` wins, then
/// `image_base + poster_path`.
pub fn poster_url(movie: &MovieCandidate, image_base: &str) -> Option<String> {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    non_empty(&movie.poster).or_else(|| {
        non_empty(&movie.poster_path).map(|path| format!("{}{}", image_base, path))
    })
}

pub fn normalize_for_storage(movie: &MovieCandidate, image_base: &str) -> FavoriteMovie {
    FavoriteMovie {
        id: movie.id,
        title: movie.title.clone(),
        poster: poster_url(movie, image_base),
        overview: movie.overview.clone(),
        release_date: movie.release_date.clone(),
        vote_average: movie.vote_average,
    }
}

/// Titles compare case-insensitively; a missing title compares as "".
pub fn same_title(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or("").to_lowercase() == b.unwrap_or("").to_lowercase()
}
