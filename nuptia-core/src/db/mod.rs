//! Database layer for nuptia
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Full-replace writes for derived analytics records

pub mod repo;
pub mod schema;

pub use repo::{Database, WeddingSummary};
