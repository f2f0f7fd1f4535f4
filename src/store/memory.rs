//! In-memory [`TrendStore`] implementation for tests.
//!
//! Uses a `Vec` behind `std::sync::RwLock` for thread safety. The
//! leaderboard query orders by count descending with the term as the
//! tie-breaker, matching what the hosted store is configured to return.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use super::{NewTrendRecord, TrendRecord, TrendStore};

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryTrendStore {
    records: RwLock<Vec<TrendRecord>>,
}

impl MemoryTrendStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all records, in insertion order.
    pub fn records(&self) -> Vec<TrendRecord> {
        self.records.read().unwrap().clone()
    }
}

#[async_trait]
impl TrendStore for MemoryTrendStore {
    async fn find_by_term(&self, term: &str) -> Result<Option<TrendRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().find(|r| r.search_term == term).cloned())
    }

    async fn create(&self, record: &NewTrendRecord) -> Result<TrendRecord> {
        let stored = TrendRecord {
            id: Uuid::new_v4().to_string(),
            search_term: record.search_term.clone(),
            count: record.count,
            poster_url: record.poster_url.clone(),
            movie_id: record.movie_id,
        };
        self.records.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn set_count(&self, id: &str, count: i64) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow!("No trend record with id {}", id))?;
        record.count = count;
        Ok(())
    }

    async fn top_by_count(&self, limit: i64) -> Result<Vec<TrendRecord>> {
        let records = self.records.read().unwrap();
        let mut ordered = records.clone();
        ordered.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.search_term.cmp(&b.search_term))
        });
        ordered.truncate(limit as usize);
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(term: &str, count: i64) -> NewTrendRecord {
        NewTrendRecord {
            search_term: term.to_string(),
            count,
            poster_url: format!("https://image.tmdb.org/t/p/w500/{}.jpg", term),
            movie_id: 1,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_find_by_term() {
        let store = MemoryTrendStore::new();
        let created = store.create(&new_record("batman", 1)).await.unwrap();
        assert!(!created.id.is_empty());

        let found = store.find_by_term("batman").await.unwrap().unwrap();
        assert_eq!(found, created);

        assert!(store.find_by_term("tenet").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_count_updates_one_record() {
        let store = MemoryTrendStore::new();
        let a = store.create(&new_record("batman", 1)).await.unwrap();
        store.create(&new_record("tenet", 1)).await.unwrap();

        store.set_count(&a.id, 7).await.unwrap();

        assert_eq!(
            store.find_by_term("batman").await.unwrap().unwrap().count,
            7
        );
        assert_eq!(store.find_by_term("tenet").await.unwrap().unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_set_count_unknown_id_is_an_error() {
        let store = MemoryTrendStore::new();
        assert!(store.set_count("missing", 2).await.is_err());
    }

    #[tokio::test]
    async fn test_top_by_count_orders_and_truncates() {
        let store = MemoryTrendStore::new();
        store.create(&new_record("alpha", 2)).await.unwrap();
        store.create(&new_record("beta", 5)).await.unwrap();
        store.create(&new_record("gamma", 3)).await.unwrap();

        let top = store.top_by_count(2).await.unwrap();
        let terms: Vec<&str> = top.iter().map(|r| r.search_term.as_str()).collect();
        assert_eq!(terms, vec!["beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_top_by_count_empty_store() {
        let store = MemoryTrendStore::new();
        assert!(store.top_by_count(5).await.unwrap().is_empty());
    }
}
