//! # Movie Scout CLI (`scout`)
//!
//! The `scout` binary drives the search and trending pipeline from the
//! terminal.
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout search "<query>"` | One-shot search; records the term when it has results |
//! | `scout search` | Print the discover feed sorted by popularity |
//! | `scout trending` | Print the most-searched terms |
//! | `scout live` | Interactive debounced search loop |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;
use tracing::warn;

use movie_scout::config::{load_config, Config};
use movie_scout::models::Movie;
use movie_scout::search::SearchController;
use movie_scout::store::appwrite::AppwriteTrendStore;
use movie_scout::tmdb::{MovieApi, TmdbClient};
use movie_scout::trending::TrendRecorder;

/// Movie Scout — debounced movie search with trending-search tracking.
#[derive(Parser)]
#[command(
    name = "scout",
    about = "Movie Scout — debounced movie search with trending-search tracking",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for movies once and print the results.
    ///
    /// A non-empty query hits the search endpoint and records the top
    /// result in the trending store; an empty query prints the discover
    /// feed sorted by popularity.
    Search {
        /// The search query. Omit to browse the discover feed.
        #[arg(default_value = "")]
        query: String,
    },

    /// Print the most-searched terms.
    Trending,

    /// Interactive mode: type to search, with debounced fetching.
    ///
    /// Each input line replaces the current term; results are printed
    /// once the term has been quiet for the configured debounce window.
    Live,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Search { query } => run_search(&config, &query).await,
        Commands::Trending => run_trending(&config).await,
        Commands::Live => run_live(&config).await,
    }
}

fn build_recorder(config: &Config) -> Result<Arc<TrendRecorder>> {
    let store = Arc::new(AppwriteTrendStore::new(&config.appwrite)?);
    Ok(Arc::new(TrendRecorder::new(
        store,
        config.search.trending_limit,
    )))
}

async fn run_search(config: &Config, query: &str) -> Result<()> {
    let client = TmdbClient::new(&config.tmdb)?;

    let movies = match client.fetch_movies(query).await {
        Ok(movies) => movies,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    if movies.is_empty() {
        println!("No results.");
        return Ok(());
    }

    if !query.is_empty() {
        let recorder = build_recorder(config)?;
        if let Err(e) = recorder.record_search(query, &movies[0]).await {
            warn!("failed to record search {query:?}: {e:#}");
        }
    }

    print_movies(&movies);
    Ok(())
}

async fn run_trending(config: &Config) -> Result<()> {
    let recorder = build_recorder(config)?;
    let records = recorder.load_trending().await;

    if records.is_empty() {
        println!("No trending searches yet.");
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        println!(
            "{}. {} ({} searches)",
            i + 1,
            record.search_term,
            record.count
        );
        println!("    poster: {}", record.poster_url);
    }
    Ok(())
}

async fn run_live(config: &Config) -> Result<()> {
    let api: Arc<dyn MovieApi> = Arc::new(TmdbClient::new(&config.tmdb)?);
    let recorder = build_recorder(config)?;

    let trending = recorder.load_trending().await;
    if !trending.is_empty() {
        println!("Trending searches:");
        for (i, record) in trending.iter().enumerate() {
            println!("  {}. {} ({} searches)", i + 1, record.search_term, record.count);
        }
        println!();
    }

    let controller = SearchController::new(
        api,
        recorder,
        Duration::from_millis(config.search.debounce_ms),
    );
    let (handle, task) = controller.spawn();

    let mut state_rx = handle.subscribe();
    let printer = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            if state.is_loading {
                continue;
            }
            if let Some(error) = &state.error {
                println!("{}", error);
            } else if state.results.is_empty() {
                println!("No results.");
            } else {
                let label = if state.debounced_term.is_empty() {
                    "discover feed".to_string()
                } else {
                    format!("{:?}", state.debounced_term)
                };
                println!("{} results for {}:", state.results.len(), label);
                print_movies(&state.results[..state.results.len().min(5)]);
            }
        }
    });

    println!("Type to search (empty line for the discover feed, Ctrl-D to quit).");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle.set_term(line.trim().to_string());
    }

    drop(handle);
    task.await?;
    printer.await?;
    Ok(())
}

fn print_movies(movies: &[Movie]) {
    for (i, movie) in movies.iter().enumerate() {
        let rating = movie
            .vote_average
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "N/A".to_string());
        let year = movie
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        println!(
            "{}. [{}] {} ({}) {}",
            i + 1,
            rating,
            movie.title,
            year,
            movie.original_language
        );
        println!("    poster: {}", movie.poster_url());
    }
}
