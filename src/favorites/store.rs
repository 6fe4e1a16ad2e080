use std::collections::HashMap;

use tracing::debug;

use super::movie::{normalize_for_storage, same_title, FavoriteMovie, MovieCandidate};

/// Key the favorites list is stored under.
pub const FAVORITES_KEY: &str = "movies";

/// String key/value storage with browser local-storage semantics.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Stored favorites are not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("Failed to encode favorites: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Movie title must not be empty")]
    EmptyTitle,
}

pub type FavoritesResult<T> = Result<T, FavoritesError>;

/// The favorites list, kept as a JSON array under [`FAVORITES_KEY`].
///
/// A movie with an id (including 0) is matched by id. Without one it is
/// matched by case-insensitive title. Stored text that does not parse is
/// reported and never overwritten.
pub struct FavoritesStore<S: Storage> {
    storage: S,
    image_base: String,
}

impl<S: Storage> FavoritesStore<S> {
    pub fn new(storage: S, image_base: impl Into<String>) -> Self {
        Self {
            storage,
            image_base: image_base.into(),
        }
    }

    pub fn list(&self) -> FavoritesResult<Vec<FavoriteMovie>> {
        match self.storage.get(FAVORITES_KEY) {
            Some(text) => serde_json::from_str(&text).map_err(FavoritesError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, favs: &[FavoriteMovie]) -> FavoritesResult<()> {
        let text = serde_json::to_string(favs).map_err(FavoritesError::Encode)?;
        self.storage.set(FAVORITES_KEY, text);
        Ok(())
    }

    pub fn is_favorite(&self, movie: &MovieCandidate) -> FavoritesResult<bool> {
        Ok(self.list()?.iter().any(|fav| is_same_movie(fav, movie)))
    }

    /// Append the movie unless it is already present. Returns whether it was added.
    pub fn add(&mut self, movie: &MovieCandidate) -> FavoritesResult<bool> {
        let mut favs = self.list()?;
        if favs.iter().any(|fav| is_same_movie(fav, movie)) {
            return Ok(false);
        }
        favs.push(normalize_for_storage(movie, &self.image_base));
        self.save(&favs)?;
        debug!(id = ?movie.id, title = ?movie.title, "Added favorite");
        Ok(true)
    }

    pub fn remove(&mut self, movie: &MovieCandidate) -> FavoritesResult<()> {
        let mut favs = self.list()?;
        favs.retain(|fav| !is_same_movie(fav, movie));
        self.save(&favs)
    }

    /// Flip the favorite state of `movie` and return the new state.
    pub fn toggle(&mut self, movie: &MovieCandidate) -> FavoritesResult<bool> {
        if self.is_favorite(movie)? {
            self.remove(movie)?;
            Ok(false)
        } else {
            self.add(movie)?;
            Ok(true)
        }
    }

    /// Entry from the manual "add movie" form. Only the title is checked for
    /// duplicates.
    pub fn add_manual(&mut self, title: &str, poster: &str) -> FavoritesResult<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FavoritesError::EmptyTitle);
        }

        let mut favs = self.list()?;
        if favs
            .iter()
            .any(|fav| same_title(fav.title.as_deref(), Some(title)))
        {
            return Ok(false);
        }

        favs.push(FavoriteMovie {
            title: Some(title.to_string()),
            poster: Some(poster.trim().to_string()),
            ..Default::default()
        });
        self.save(&favs)?;
        Ok(true)
    }
}

fn is_same_movie(fav: &FavoriteMovie, movie: &MovieCandidate) -> bool {
    match movie.id {
        Some(id) => fav.id == Some(id),
        None => same_title(fav.title.as_deref(), movie.title.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn store() -> FavoritesStore<MemoryStorage> {
        FavoritesStore::new(MemoryStorage::new(), IMAGE_BASE)
    }

    fn movie(id: Option<u64>, title: &str) -> MovieCandidate {
        MovieCandidate {
            id,
            title: Some(title.to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_list() {
        assert!(store().list().unwrap().is_empty());
    }

    #[test]
    fn test_add_deduplicates_by_id() {
        let mut store = store();
        assert!(store.add(&movie(Some(1), "Heat")).unwrap());
        assert!(!store.add(&movie(Some(1), "Heat (1995)")).unwrap());
        assert!(store.add(&movie(Some(2), "Heat")).unwrap());

        let favs = store.list().unwrap();
        assert_eq!(favs.len(), 2);
        assert_eq!(
            favs[0].poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
    }

    #[test]
    fn test_title_match_without_id() {
        let mut store = store();
        store.add(&movie(None, "Paprika")).unwrap();
        assert!(store.is_favorite(&movie(None, "PAPRIKA")).unwrap());
        assert!(!store.add(&movie(None, "paprika")).unwrap());
        // An id lookup never falls back to the title.
        assert!(!store.is_favorite(&movie(Some(9), "Paprika")).unwrap());
    }

    #[test]
    fn test_remove() {
        let mut store = store();
        store.add(&movie(Some(1), "Heat")).unwrap();
        store.add(&movie(None, "Ran")).unwrap();

        store.remove(&movie(Some(1), "whatever")).unwrap();
        store.remove(&movie(None, "RAN")).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut store = store();
        let m = movie(Some(42), "Stalker");
        assert!(store.toggle(&m).unwrap());
        assert!(store.is_favorite(&m).unwrap());
        assert!(!store.toggle(&m).unwrap());
        assert!(!store.is_favorite(&m).unwrap());
    }

    #[test]
    fn test_add_manual() {
        let mut store = store();
        store.add(&movie(Some(7), "Solaris")).unwrap();

        assert!(!store.add_manual("  solaris ", "").unwrap());
        assert!(store.add_manual("My Home Movie", "http://img/x.png").unwrap());
        assert!(matches!(
            store.add_manual("   ", "x"),
            Err(FavoritesError::EmptyTitle)
        ));

        let favs = store.list().unwrap();
        assert_eq!(favs.len(), 2);
        assert_eq!(favs[1].id, None);
        assert_eq!(favs[1].title.as_deref(), Some("My Home Movie"));
    }

    #[test]
    fn test_reads_browser_written_list() {
        let mut storage = MemoryStorage::new();
        storage.set(
            FAVORITES_KEY,
            r#"[{"title":"Typed By Hand","poster":""},{"id":5,"title":"Four Rooms","poster":null,"vote_average":5.8}]"#
                .to_string(),
        );
        let store = FavoritesStore::new(storage, IMAGE_BASE);

        let favs = store.list().unwrap();
        assert_eq!(favs.len(), 2);
        assert!(store.is_favorite(&movie(Some(5), "x")).unwrap());
        assert!(store
            .is_favorite(&MovieCandidate::from(&favs[0]))
            .unwrap());
    }

    #[test]
    fn test_corrupt_storage_is_never_overwritten() {
        let mut storage = MemoryStorage::new();
        storage.set(FAVORITES_KEY, "not json".to_string());
        let mut store = FavoritesStore::new(storage, IMAGE_BASE);
        assert!(matches!(store.list(), Err(FavoritesError::Corrupt(_))));

        assert!(store.add(&movie(Some(1), "Heat")).is_err());
        assert!(store.toggle(&movie(Some(1), "Heat")).is_err());
        assert!(store.remove(&movie(Some(1), "Heat")).is_err());
        assert!(store.add_manual("Heat", "").is_err());
        assert_eq!(store.storage.get(FAVORITES_KEY).as_deref(), Some("not json"));
    }

    #[test]
    fn test_zero_id_matches_by_id() {
        let mut store = store();
        store.add(&movie(Some(0), "Zero")).unwrap();
        assert!(store.is_favorite(&movie(Some(0), "Another Title")).unwrap());
        assert!(!store.is_favorite(&movie(Some(1), "Zero")).unwrap());
    }
}
