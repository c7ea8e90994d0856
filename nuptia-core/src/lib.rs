//! # nuptia-core
//!
//! Core library for nuptia - a wedding planning analytics backend.
//!
//! This library provides:
//! - Domain types for weddings, guests, tasks, budgets, vendors, and timelines
//! - Database storage layer with SQLite
//! - An analytics engine deriving health scores and trend snapshots
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data lives in two layers:
//! - **Layer 1 (Canonical):** the planning records themselves — weddings and
//!   the collections they own
//! - **Layer 2 (Derived):** computed analytics (snapshots, weekly trends,
//!   engagement metrics) that are pure functions of Layer 1 and can be
//!   regenerated at any time
//!
//! ## Example
//!
//! ```rust,no_run
//! use nuptia_core::{AnalyticsEngine, Config, Database};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! // Recompute analytics for a wedding
//! let engine = AnalyticsEngine::new();
//! let snapshot = engine.compute("wedding-id", &db).expect("failed to compute");
//! println!("overall health: {}", snapshot.overall_health_score);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::AnalyticsEngine;
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
