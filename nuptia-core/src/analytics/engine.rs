//! Analytics engine: read collections, compute, write back.
//!
//! The engine is the only place where analytics touch storage. Every
//! operation follows the same shape:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ANALYTICS ENGINE                      │
//! │                                                          │
//! │   Database ──load collections──▶ pure computation        │
//! │      ▲                                │                  │
//! │      └────────full-replace write──────┘                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshots are always recomputed in full from the current collections;
//! nothing is patched incrementally. Storage failures propagate to the
//! caller unchanged: there are no retries and no partial-success states.
//! Two concurrent recomputations race last-writer-wins, which is fine —
//! either result is a valid snapshot of a slightly different instant.

use crate::analytics::engagement::{capture_weekly_snapshot, compute_engagement, summarize_pledges};
use crate::analytics::report::{AnalyticsReport, ComparisonData};
use crate::analytics::snapshot::compute_snapshot;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{
    AnalyticsSnapshot, BudgetItem, EngagementMetrics, Guest, Task, TimelineEvent, Vendor, Wedding,
    WeeklySnapshot,
};
use chrono::{Local, NaiveDate};

/// Loaded Layer 1 collections for one wedding.
struct Collections {
    wedding: Wedding,
    guests: Vec<Guest>,
    budget_items: Vec<BudgetItem>,
    tasks: Vec<Task>,
    vendors: Vec<Vendor>,
    events: Vec<TimelineEvent>,
}

/// Engine that recomputes derived analytics for weddings.
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn load_collections(&self, wedding_id: &str, db: &Database) -> Result<Collections> {
        let wedding = db
            .get_wedding(wedding_id)?
            .ok_or_else(|| Error::WeddingNotFound(wedding_id.to_string()))?;

        Ok(Collections {
            wedding,
            guests: db.list_guests(wedding_id)?,
            budget_items: db.list_budget_items(wedding_id)?,
            tasks: db.list_tasks(wedding_id)?,
            vendors: db.list_vendors(wedding_id)?,
            events: db.list_timeline_events(wedding_id)?,
        })
    }

    /// Recompute and store the analytics snapshot for a wedding.
    ///
    /// The stored snapshot is replaced in full; the returned value is what
    /// was written.
    pub fn compute(&self, wedding_id: &str, db: &Database) -> Result<AnalyticsSnapshot> {
        let collections = self.load_collections(wedding_id, db)?;

        let snapshot = compute_snapshot(
            &collections.wedding,
            &collections.guests,
            &collections.budget_items,
            &collections.tasks,
            &collections.vendors,
            &collections.events,
            Self::today(),
        );

        db.upsert_analytics_snapshot(&snapshot)?;

        tracing::info!(
            wedding_id,
            guests = collections.guests.len(),
            budget_items = collections.budget_items.len(),
            tasks = collections.tasks.len(),
            vendors = collections.vendors.len(),
            overall_health = snapshot.overall_health_score,
            "Computed analytics snapshot"
        );

        Ok(snapshot)
    }

    /// Capture and append a weekly trend snapshot for a wedding.
    ///
    /// Always inserts a new row, even within the same ISO week.
    pub fn create_weekly_snapshot(&self, wedding_id: &str, db: &Database) -> Result<WeeklySnapshot> {
        let collections = self.load_collections(wedding_id, db)?;

        let mut snapshot = capture_weekly_snapshot(
            wedding_id,
            &collections.guests,
            &collections.budget_items,
            &collections.tasks,
            Self::today(),
        );
        snapshot.id = db.insert_weekly_snapshot(&snapshot)?;

        tracing::info!(
            wedding_id,
            week_number = snapshot.week_number,
            confirmed = snapshot.confirmed_count,
            "Captured weekly snapshot"
        );

        Ok(snapshot)
    }

    /// Recompute and store the guest engagement metrics for a wedding.
    pub fn compute_engagement(&self, wedding_id: &str, db: &Database) -> Result<EngagementMetrics> {
        let wedding = db
            .get_wedding(wedding_id)?
            .ok_or_else(|| Error::WeddingNotFound(wedding_id.to_string()))?;

        let guests = db.list_guests(&wedding.id)?;
        let metrics = compute_engagement(&wedding.id, &guests);
        db.upsert_engagement_metrics(&metrics)?;

        tracing::info!(
            wedding_id,
            response_rate = metrics.rsvp_response_rate,
            "Computed engagement metrics"
        );

        Ok(metrics)
    }

    /// Build the full analytics response for a wedding: fresh snapshot,
    /// fresh engagement metrics, comparison data, health report, and the
    /// pledge summary.
    pub fn full_report(&self, wedding_id: &str, db: &Database) -> Result<AnalyticsReport> {
        let analytics = self.compute(wedding_id, db)?;
        let engagement = self.compute_engagement(wedding_id, db)?;
        let pledges = summarize_pledges(&db.list_pledges(wedding_id)?);

        let comparison = ComparisonData::from_snapshot(&analytics);
        let health_report = analytics.health_report();

        Ok(AnalyticsReport {
            analytics,
            engagement,
            comparison,
            health_report,
            pledges,
        })
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Relationship, RsvpStatus};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn test_db() -> Database {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.migrate().expect("migrate schema");
        db
    }

    fn seed_wedding(db: &Database) -> Wedding {
        let wedding = Wedding::new(
            "Amina",
            "Jabari",
            Local::now().date_naive() + Duration::days(90),
            "Lakeside Gardens",
            Decimal::from(30_000),
        );
        db.upsert_wedding(&wedding).expect("insert wedding");
        wedding
    }

    #[test]
    fn test_compute_unknown_wedding_is_not_found() {
        let db = test_db();
        let engine = AnalyticsEngine::new();

        let err = engine.compute("missing", &db).unwrap_err();
        assert!(matches!(err, Error::WeddingNotFound(ref id) if id == "missing"));
    }

    #[test]
    fn test_compute_persists_snapshot() {
        let db = test_db();
        let engine = AnalyticsEngine::new();
        let wedding = seed_wedding(&db);

        db.insert_guest(&Guest {
            id: "g1".to_string(),
            wedding_id: wedding.id.clone(),
            name: "Neema".to_string(),
            phone: String::new(),
            email: String::new(),
            relationship: Relationship::Family,
            rsvp_status: RsvpStatus::Confirmed,
            party_size: 2,
            dietary_notes: String::new(),
            created_at: Utc::now(),
        })
        .unwrap();

        let returned = engine.compute(&wedding.id, &db).expect("compute succeeds");
        let stored = db
            .get_analytics_snapshot(&wedding.id)
            .unwrap()
            .expect("snapshot stored");

        assert_eq!(returned, stored);
        assert_eq!(stored.total_invitations_sent, 1);
        assert_eq!(stored.total_confirmed, 1);
        assert_eq!(stored.guest_health_score, 100.0);
        assert_eq!(stored.days_until_wedding, 90);
    }

    #[test]
    fn test_weekly_snapshot_appends_within_same_week() {
        let db = test_db();
        let engine = AnalyticsEngine::new();
        let wedding = seed_wedding(&db);

        let first = engine.create_weekly_snapshot(&wedding.id, &db).unwrap();
        let second = engine.create_weekly_snapshot(&wedding.id, &db).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.week_number, second.week_number);

        let rows = db.list_weekly_snapshots(&wedding.id).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_full_report_shape() {
        let db = test_db();
        let engine = AnalyticsEngine::new();
        let wedding = seed_wedding(&db);

        let report = engine.full_report(&wedding.id, &db).unwrap();
        assert_eq!(report.analytics.wedding_id, wedding.id);
        assert_eq!(report.health_report.overall_health, 100.0);
        assert_eq!(report.engagement.rsvp_response_rate, 0.0);
        assert_eq!(report.pledges.total_pledges, 0);

        // Engagement metrics were upserted as a side effect
        assert!(db.get_engagement_metrics(&wedding.id).unwrap().is_some());
    }
}
