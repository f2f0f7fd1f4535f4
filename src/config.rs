use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    pub appwrite: AppwriteConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Bearer token for the metadata API. Falls back to `TMDB_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppwriteConfig {
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    /// API key for the document store. Falls back to `APPWRITE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Quiet period before a raw term becomes the debounced term.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How many records the trending leaderboard shows.
    #[serde(default = "default_trending_limit")]
    pub trending_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_debounce_ms() -> u64 {
    500
}
fn default_trending_limit() -> i64 {
    5
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.debounce_ms == 0 {
        anyhow::bail!("search.debounce_ms must be > 0");
    }
    if config.search.trending_limit < 1 {
        anyhow::bail!("search.trending_limit must be >= 1");
    }
    if config.tmdb.timeout_secs == 0 {
        anyhow::bail!("tmdb.timeout_secs must be > 0");
    }
    if config.appwrite.project_id.trim().is_empty() {
        anyhow::bail!("appwrite.project_id must not be empty");
    }
    if config.appwrite.database_id.trim().is_empty() {
        anyhow::bail!("appwrite.database_id must not be empty");
    }
    if config.appwrite.collection_id.trim().is_empty() {
        anyhow::bail!("appwrite.collection_id must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scout.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    const MINIMAL: &str = r#"
[appwrite]
project_id = "proj"
database_id = "db"
collection_id = "coll"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let (_tmp, path) = write_config(MINIMAL);
        let config = load_config(&path).unwrap();

        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.timeout_secs, 10);
        assert_eq!(config.appwrite.endpoint, "https://cloud.appwrite.io/v1");
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.trending_limit, 5);
    }

    #[test]
    fn test_zero_debounce_rejected() {
        let (_tmp, path) = write_config(
            r#"
[appwrite]
project_id = "proj"
database_id = "db"
collection_id = "coll"

[search]
debounce_ms = 0
"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_zero_trending_limit_rejected() {
        let (_tmp, path) = write_config(
            r#"
[appwrite]
project_id = "proj"
database_id = "db"
collection_id = "coll"

[search]
trending_limit = 0
"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("trending_limit"));
    }

    #[test]
    fn test_blank_collection_id_rejected() {
        let (_tmp, path) = write_config(
            r#"
[appwrite]
project_id = "proj"
database_id = "db"
collection_id = "  "
"#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(load_config(&missing).is_err());
    }
}
