//! Core data types shared by the search and trending pipelines.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Image CDN base prepended to API-provided poster paths.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Local placeholder asset used when a movie carries no poster path.
pub const POSTER_PLACEHOLDER: &str = "no-movie.png";

/// A movie as returned by the metadata API. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: String,
}

impl Movie {
    /// Poster asset URL: CDN base plus the API path, or the local
    /// placeholder when the API supplied no poster path.
    pub fn poster_url(&self) -> String {
        match &self.poster_path {
            Some(path) => format!("{}{}", POSTER_BASE_URL, path),
            None => POSTER_PLACEHOLDER.to_string(),
        }
    }

    /// Release year parsed from the ISO release date, if present and valid.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

/// View state owned by the search controller and published to subscribers.
///
/// `is_loading` covers exactly one conceptually-current fetch: a later
/// debounced term supersedes an earlier in-flight one, and the superseded
/// response is discarded rather than committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// The term as typed, updated on every input event.
    pub raw_term: String,
    /// The term after the debounce window, the one fetches are issued for.
    pub debounced_term: String,
    pub is_loading: bool,
    /// User-facing error message for the last settled fetch, if any.
    pub error: Option<String>,
    pub results: Vec<Movie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with(poster_path: Option<&str>, release_date: Option<&str>) -> Movie {
        Movie {
            id: 1,
            title: "Test".to_string(),
            poster_path: poster_path.map(String::from),
            release_date: release_date.map(String::from),
            vote_average: Some(7.5),
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_poster_url_concatenates_cdn_base() {
        let movie = movie_with(Some("/abc123.jpg"), None);
        assert_eq!(
            movie.poster_url(),
            "https://image.tmdb.org/t/p/w500/abc123.jpg"
        );
    }

    #[test]
    fn test_poster_url_falls_back_to_placeholder() {
        let movie = movie_with(None, None);
        assert_eq!(movie.poster_url(), POSTER_PLACEHOLDER);
    }

    #[test]
    fn test_release_year_parses_iso_date() {
        let movie = movie_with(None, Some("2008-07-18"));
        assert_eq!(movie.release_year(), Some(2008));
    }

    #[test]
    fn test_release_year_invalid_date() {
        let movie = movie_with(None, Some("not-a-date"));
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_release_year_missing_date() {
        let movie = movie_with(None, None);
        assert_eq!(movie.release_year(), None);
    }
}
