//! Trending-search recorder.
//!
//! Maintains a most-searched leaderboard with upsert semantics: the first
//! successful search for a term creates a record with count 1, every later
//! one bumps the counter. Store failures are logged and swallowed here so
//! a trending outage never degrades the primary search path.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::models::Movie;
use crate::store::{NewTrendRecord, TrendRecord, TrendStore};

pub struct TrendRecorder {
    store: Arc<dyn TrendStore>,
    limit: i64,
}

impl TrendRecorder {
    pub fn new(store: Arc<dyn TrendStore>, limit: i64) -> Self {
        Self { store, limit }
    }

    /// Record one successful search for `term` whose top result was `movie`.
    ///
    /// Find-then-write upsert: an existing record gets its counter bumped
    /// through a partial update; a missing one is created with count 1 and
    /// the movie's id and poster URL. Two overlapping recordings of the
    /// same term can both read count N and both write N + 1; the counter
    /// is best-effort, not exact.
    pub async fn record_search(&self, term: &str, movie: &Movie) -> Result<()> {
        match self.store.find_by_term(term).await? {
            Some(existing) => {
                self.store
                    .set_count(&existing.id, existing.count + 1)
                    .await?;
            }
            None => {
                self.store
                    .create(&NewTrendRecord {
                        search_term: term.to_string(),
                        count: 1,
                        poster_url: movie.poster_url(),
                        movie_id: movie.id,
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// The current top searches, most-searched first.
    ///
    /// Returns an empty list on any store failure; the trending panel
    /// simply hides rather than surfacing an error.
    pub async fn load_trending(&self) -> Vec<TrendRecord> {
        match self.store.top_by_count(self.limit).await {
            Ok(records) => records,
            Err(e) => {
                warn!("failed to load trending searches: {e:#}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryTrendStore;
    use anyhow::bail;
    use async_trait::async_trait;

    /// Store whose every operation fails, for isolation tests.
    struct FailingStore;

    #[async_trait]
    impl TrendStore for FailingStore {
        async fn find_by_term(&self, _term: &str) -> Result<Option<TrendRecord>> {
            bail!("store unavailable")
        }
        async fn create(&self, _record: &NewTrendRecord) -> Result<TrendRecord> {
            bail!("store unavailable")
        }
        async fn set_count(&self, _id: &str, _count: i64) -> Result<()> {
            bail!("store unavailable")
        }
        async fn top_by_count(&self, _limit: i64) -> Result<Vec<TrendRecord>> {
            bail!("store unavailable")
        }
    }

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            release_date: None,
            vote_average: None,
            original_language: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_search_creates_record_with_count_one() {
        let store = Arc::new(MemoryTrendStore::new());
        let recorder = TrendRecorder::new(store.clone(), 5);

        recorder
            .record_search("batman", &movie(155, "The Dark Knight"))
            .await
            .unwrap();

        let record = store.find_by_term("batman").await.unwrap().unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, 155);
        assert_eq!(
            record.poster_url,
            "https://image.tmdb.org/t/p/w500/155.jpg"
        );
    }

    #[tokio::test]
    async fn test_repeat_search_increments_single_record() {
        let store = Arc::new(MemoryTrendStore::new());
        let recorder = TrendRecorder::new(store.clone(), 5);
        let top = movie(155, "The Dark Knight");

        recorder.record_search("batman", &top).await.unwrap();
        recorder.record_search("batman", &top).await.unwrap();

        assert_eq!(store.len(), 1);
        let record = store.find_by_term("batman").await.unwrap().unwrap();
        assert_eq!(record.count, 2);
    }

    #[tokio::test]
    async fn test_load_trending_orders_by_count() {
        let store = Arc::new(MemoryTrendStore::new());
        let recorder = TrendRecorder::new(store.clone(), 5);

        recorder.record_search("tenet", &movie(1, "Tenet")).await.unwrap();
        recorder
            .record_search("batman", &movie(155, "The Dark Knight"))
            .await
            .unwrap();
        recorder
            .record_search("batman", &movie(155, "The Dark Knight"))
            .await
            .unwrap();

        let trending = recorder.load_trending().await;
        let terms: Vec<&str> = trending.iter().map(|r| r.search_term.as_str()).collect();
        assert_eq!(terms, vec!["batman", "tenet"]);
    }

    #[tokio::test]
    async fn test_load_trending_empty_store_yields_empty_list() {
        let recorder = TrendRecorder::new(Arc::new(MemoryTrendStore::new()), 5);
        assert!(recorder.load_trending().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_trending_swallows_store_failure() {
        let recorder = TrendRecorder::new(Arc::new(FailingStore), 5);
        assert!(recorder.load_trending().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_search_surfaces_store_failure_to_caller() {
        // The caller decides to log and swallow; the recorder itself
        // propagates so the failure is observable.
        let recorder = TrendRecorder::new(Arc::new(FailingStore), 5);
        let result = recorder.record_search("batman", &movie(155, "x")).await;
        assert!(result.is_err());
    }
}
