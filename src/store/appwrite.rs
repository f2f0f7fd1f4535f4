//! Hosted document-store backend.
//!
//! Implements [`TrendStore`] against an Appwrite-style collection REST API:
//! `GET .../documents` with serialized query filters, `POST` to create a
//! document with a server-generated id, and `PATCH` for partial updates.
//! Authenticates with project and API-key headers on every request.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{NewTrendRecord, TrendRecord, TrendStore};
use crate::config::AppwriteConfig;

pub struct AppwriteTrendStore {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    collection_id: String,
}

/// Wire shape of one stored document.
#[derive(Debug, Deserialize)]
struct DocumentRow {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: i64,
    poster_url: String,
    movie_id: i64,
}

impl From<DocumentRow> for TrendRecord {
    fn from(row: DocumentRow) -> Self {
        TrendRecord {
            id: row.id,
            search_term: row.search_term,
            count: row.count,
            poster_url: row.poster_url,
            movie_id: row.movie_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<DocumentRow>,
}

/// Serialized equality filter for the documents listing endpoint.
fn equal_query(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

/// Serialized descending-order clause.
fn order_desc_query(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

/// Serialized result-count clause.
fn limit_query(limit: i64) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

impl AppwriteTrendStore {
    /// Create a store client from configuration.
    ///
    /// The API key comes from the config or the `APPWRITE_API_KEY`
    /// environment variable.
    pub fn new(config: &AppwriteConfig) -> Result<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => match std::env::var("APPWRITE_API_KEY") {
                Ok(key) => key,
                Err(_) => bail!("APPWRITE_API_KEY environment variable not set"),
            },
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key,
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .header("content-type", "application/json")
    }

    async fn list(&self, queries: &[String]) -> Result<Vec<DocumentRow>> {
        let mut request = self.http.get(self.documents_url());
        for query in queries {
            request = request.query(&[("queries[]", query)]);
        }

        let response = self
            .auth(request)
            .send()
            .await
            .context("Trend store request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Trend store error {}: {}", status, body);
        }

        let list: DocumentList = response
            .json()
            .await
            .context("Failed to decode trend store response")?;
        Ok(list.documents)
    }
}

#[async_trait]
impl TrendStore for AppwriteTrendStore {
    async fn find_by_term(&self, term: &str) -> Result<Option<TrendRecord>> {
        let rows = self.list(&[equal_query("searchTerm", term)]).await?;
        Ok(rows.into_iter().next().map(TrendRecord::from))
    }

    async fn create(&self, record: &NewTrendRecord) -> Result<TrendRecord> {
        let body = json!({
            "documentId": "unique()",
            "data": record,
        });

        let response = self
            .auth(self.http.post(self.documents_url()))
            .json(&body)
            .send()
            .await
            .context("Trend store request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Trend store error {}: {}", status, body);
        }

        let row: DocumentRow = response
            .json()
            .await
            .context("Failed to decode created trend record")?;
        Ok(row.into())
    }

    async fn set_count(&self, id: &str, count: i64) -> Result<()> {
        let url = format!("{}/{}", self.documents_url(), id);
        let body = json!({ "data": { "count": count } });

        let response = self
            .auth(self.http.patch(url))
            .json(&body)
            .send()
            .await
            .context("Trend store request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Trend store error {}: {}", status, body);
        }

        Ok(())
    }

    async fn top_by_count(&self, limit: i64) -> Result<Vec<TrendRecord>> {
        let rows = self
            .list(&[order_desc_query("count"), limit_query(limit)])
            .await?;
        Ok(rows.into_iter().map(TrendRecord::from).collect())
    }
}
