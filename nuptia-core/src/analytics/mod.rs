//! Analytics module for nuptia
//!
//! Provides derived statistics for a wedding plan:
//! - Full analytics snapshots with per-dimension health scores
//! - Weekly trend snapshots (append-only history)
//! - Guest engagement metrics
//! - Report shapes for client responses (comparison, breakdowns, labels)
//!
//! ## Architecture
//!
//! Aggregation is split into pure functions over already-loaded,
//! immutable collections ([`snapshot`], [`engagement`]) and a thin
//! [`engine`] that loads collections from the database, invokes the pure
//! computation, and writes the result back with full-replace semantics.
//! This keeps every formula unit-testable without a datastore.

pub mod engagement;
pub mod engine;
pub mod report;
pub mod snapshot;

pub use engagement::{capture_weekly_snapshot, compute_engagement, summarize_pledges, PledgeSummary};
pub use engine::AnalyticsEngine;
pub use report::{
    budget_status_label, category_breakdown_report, guest_status_label, overall_status_label,
    planning_status_label, task_status_label, AnalyticsReport, CategoryBreakdownRow,
    ComparisonData, HealthReport, TimelineStatusReport,
};
pub use snapshot::compute_snapshot;
