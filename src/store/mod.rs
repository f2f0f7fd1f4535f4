//! Storage abstraction for trending records.
//!
//! The [`TrendStore`] trait defines the document-store operations the
//! trending pipeline needs, enabling pluggable backends (hosted document
//! API, in-memory for tests).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod appwrite;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// A persisted trending counter: one record per search term.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRecord {
    /// Store-assigned document id.
    pub id: String,
    /// The search term; unique within the collection.
    pub search_term: String,
    /// How many times the term has been searched. Always >= 1.
    pub count: i64,
    /// Poster URL of the most recent top result for the term.
    pub poster_url: String,
    /// Metadata API id of that top result.
    pub movie_id: i64,
}

/// Field values for a record that does not exist yet. Serializes to the
/// collection's wire attribute names.
#[derive(Debug, Clone, Serialize)]
pub struct NewTrendRecord {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    pub poster_url: String,
    pub movie_id: i64,
}

/// Abstract document-store backend for trending records.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_by_term`](TrendStore::find_by_term) | Equality query on the search term |
/// | [`create`](TrendStore::create) | Insert with a store-generated id |
/// | [`set_count`](TrendStore::set_count) | Partial update of one record's counter |
/// | [`top_by_count`](TrendStore::top_by_count) | Leaderboard query, ordered and limited by the store |
#[async_trait]
pub trait TrendStore: Send + Sync {
    /// Look up the record whose search term equals `term`.
    async fn find_by_term(&self, term: &str) -> Result<Option<TrendRecord>>;

    /// Create a record with a store-generated id and return it.
    async fn create(&self, record: &NewTrendRecord) -> Result<TrendRecord>;

    /// Partially update one record, setting its counter to `count`.
    async fn set_count(&self, id: &str, count: i64) -> Result<()>;

    /// The top `limit` records ordered by descending count. Ordering and
    /// truncation are enforced by the store query, not the caller.
    async fn top_by_count(&self, limit: i64) -> Result<Vec<TrendRecord>>;
}
