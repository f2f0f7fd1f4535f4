//! # Movie Scout
//!
//! A debounced movie search pipeline with trending-search tracking.
//!
//! Movie Scout wires two external HTTP collaborators into one async core:
//! a TMDB-shaped movie metadata API serving search and discover results,
//! and an Appwrite-shaped document store that keeps a counter of how often
//! each search term has been used.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────┐   ┌────────────┐
//! │  input   │──▶│  Search Controller    │──▶│  metadata  │
//! │ (events) │   │ debounce + staleness  │   │ API (HTTP) │
//! └──────────┘   └──────────┬───────────┘   └────────────┘
//!                           │ fire-and-forget
//!                           ▼
//!                 ┌──────────────────┐   ┌────────────────┐
//!                 │  Trend Recorder  │──▶│ document store │
//!                 │  upsert + top-N  │   │     (HTTP)     │
//!                 └──────────────────┘   └────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! scout search "batman"         # one-shot search, records the term
//! scout trending                # print the most-searched terms
//! scout live                    # interactive debounced search loop
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`tmdb`] | Movie metadata API client |
//! | [`search`] | Debounced search controller |
//! | [`trending`] | Trending-search recorder |
//! | [`store`] | Trend record storage backends |

pub mod config;
pub mod models;
pub mod search;
pub mod store;
pub mod tmdb;
pub mod trending;
