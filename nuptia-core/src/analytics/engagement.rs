//! Guest engagement metrics and weekly trend snapshots.
//!
//! Like the main snapshot computation, everything here is a pure function
//! of the collections passed in.

use crate::types::{
    BudgetItem, EngagementMetrics, Guest, Pledge, Relationship, Task, WeeklySnapshot,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Compute guest engagement metrics for a wedding.
///
/// Unlike the health scores, the engagement rates default to 0 (not 100)
/// with no guests: an empty guest list has no engagement to report.
pub fn compute_engagement(wedding_id: &str, guests: &[Guest]) -> EngagementMetrics {
    let total = guests.len() as i64;

    let responded = guests
        .iter()
        .filter(|g| g.rsvp_status.has_responded())
        .count() as i64;
    let rsvp_response_rate = if total > 0 {
        responded as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    // Zero-filled over the full category set so clients always see every key
    let mut relationship_breakdown: BTreeMap<String, i64> = Relationship::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), 0))
        .collect();
    for guest in guests {
        *relationship_breakdown
            .entry(guest.relationship.as_str().to_string())
            .or_insert(0) += 1;
    }

    let dietary = guests.iter().filter(|g| !g.dietary_notes.is_empty()).count() as i64;
    let dietary_requirements_percentage = if total > 0 {
        dietary as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let mut group_size_distribution: BTreeMap<i64, i64> = BTreeMap::new();
    for guest in guests {
        *group_size_distribution.entry(guest.party_size).or_insert(0) += 1;
    }

    EngagementMetrics {
        wedding_id: wedding_id.to_string(),
        rsvp_response_rate,
        relationship_breakdown,
        dietary_requirements_percentage,
        group_size_distribution,
        computed_at: Utc::now(),
    }
}

/// Capture the counts for a weekly trend snapshot as of `today`.
///
/// The returned record has `id` 0 until it is inserted. Capture is
/// deliberately not deduplicated per week: calling twice in the same ISO
/// week yields two rows, preserving the manual re-snapshot history.
pub fn capture_weekly_snapshot(
    wedding_id: &str,
    guests: &[Guest],
    budget_items: &[BudgetItem],
    tasks: &[Task],
    today: NaiveDate,
) -> WeeklySnapshot {
    let confirmed_count = guests
        .iter()
        .filter(|g| g.rsvp_status == crate::types::RsvpStatus::Confirmed)
        .count() as i64;
    let pending_count = guests
        .iter()
        .filter(|g| g.rsvp_status == crate::types::RsvpStatus::Pending)
        .count() as i64;

    let spending_to_date: Decimal = budget_items.iter().map(|i| i.actual_or_zero()).sum();

    let tasks_completed = tasks.iter().filter(|t| !t.status.is_open()).count() as i64;
    let tasks_pending = tasks.iter().filter(|t| t.status.is_open()).count() as i64;

    WeeklySnapshot {
        id: 0,
        wedding_id: wedding_id.to_string(),
        week_number: today.iso_week().week(),
        confirmed_count,
        pending_count,
        spending_to_date,
        tasks_completed,
        tasks_pending,
        created_at: Utc::now(),
    }
}

/// Rollup of a wedding's pledge ledger.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PledgeSummary {
    /// Sum of committed amounts
    pub total_pledged: Decimal,
    /// Sum of amounts received
    pub total_paid: Decimal,
    /// Sum of outstanding balances
    pub total_balance: Decimal,
    /// paid / pledged * 100 (0 with nothing pledged)
    pub collection_rate: f64,
    /// Pledge count per payment status, zero-filled over the full set
    pub status_breakdown: BTreeMap<String, i64>,
    /// Total number of pledges
    pub total_pledges: i64,
}

/// Summarize a wedding's pledges.
pub fn summarize_pledges(pledges: &[Pledge]) -> PledgeSummary {
    use rust_decimal::prelude::ToPrimitive;

    let mut total_pledged = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut status_breakdown: BTreeMap<String, i64> = crate::types::PledgeStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();

    for pledge in pledges {
        total_pledged += pledge.pledged_amount;
        total_paid += pledge.paid_amount;
        *status_breakdown
            .entry(pledge.payment_status.as_str().to_string())
            .or_insert(0) += 1;
    }

    let collection_rate = if total_pledged > Decimal::ZERO {
        total_paid.to_f64().unwrap_or(0.0) / total_pledged.to_f64().unwrap_or(1.0) * 100.0
    } else {
        0.0
    };

    PledgeSummary {
        total_pledged,
        total_paid,
        total_balance: total_pledged - total_paid,
        collection_rate,
        status_breakdown,
        total_pledges: pledges.len() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PledgeStatus, RsvpStatus, TaskPriority, TaskStatus};

    fn guest(rsvp: RsvpStatus, relationship: Relationship, party_size: i64, dietary: &str) -> Guest {
        Guest {
            id: uuid::Uuid::new_v4().to_string(),
            wedding_id: "wedding-1".to_string(),
            name: "Guest".to_string(),
            phone: String::new(),
            email: String::new(),
            relationship,
            rsvp_status: rsvp,
            party_size,
            dietary_notes: dietary.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_engagement_with_no_guests() {
        let metrics = compute_engagement("wedding-1", &[]);
        assert_eq!(metrics.rsvp_response_rate, 0.0);
        assert_eq!(metrics.dietary_requirements_percentage, 0.0);
        assert!(metrics.group_size_distribution.is_empty());
        // Category keys are present even when empty
        assert_eq!(metrics.relationship_breakdown.len(), 4);
        assert_eq!(metrics.relationship_breakdown["family"], 0);
    }

    #[test]
    fn test_engagement_rates_and_breakdowns() {
        let guests = vec![
            guest(RsvpStatus::Confirmed, Relationship::Family, 2, "vegan"),
            guest(RsvpStatus::Declined, Relationship::Family, 1, ""),
            guest(RsvpStatus::Pending, Relationship::Friend, 2, "gluten-free"),
            guest(RsvpStatus::Pending, Relationship::Colleague, 4, ""),
        ];

        let metrics = compute_engagement("wedding-1", &guests);
        // 2 of 4 responded (a decline is a response)
        assert_eq!(metrics.rsvp_response_rate, 50.0);
        assert_eq!(metrics.dietary_requirements_percentage, 50.0);
        assert_eq!(metrics.relationship_breakdown["family"], 2);
        assert_eq!(metrics.relationship_breakdown["friend"], 1);
        assert_eq!(metrics.relationship_breakdown["colleague"], 1);
        assert_eq!(metrics.relationship_breakdown["other"], 0);
        assert_eq!(metrics.group_size_distribution[&2], 2);
        assert_eq!(metrics.group_size_distribution[&1], 1);
        assert_eq!(metrics.group_size_distribution[&4], 1);
    }

    #[test]
    fn test_weekly_capture_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let guests = vec![
            guest(RsvpStatus::Confirmed, Relationship::Friend, 1, ""),
            guest(RsvpStatus::Confirmed, Relationship::Friend, 2, ""),
            guest(RsvpStatus::Pending, Relationship::Other, 1, ""),
            guest(RsvpStatus::Declined, Relationship::Other, 1, ""),
        ];
        let items = vec![
            BudgetItem {
                id: "b1".to_string(),
                wedding_id: "wedding-1".to_string(),
                category: crate::types::BudgetCategory::Venue,
                item_name: "Hall".to_string(),
                estimated_cost: Decimal::from(5_000),
                actual_cost: Some(Decimal::from(4_500)),
                notes: String::new(),
                created_at: Utc::now(),
            },
            BudgetItem {
                id: "b2".to_string(),
                wedding_id: "wedding-1".to_string(),
                category: crate::types::BudgetCategory::Music,
                item_name: "Band".to_string(),
                estimated_cost: Decimal::from(1_000),
                actual_cost: None,
                notes: String::new(),
                created_at: Utc::now(),
            },
        ];
        let now = Utc::now();
        let tasks = vec![
            Task {
                id: "t1".to_string(),
                wedding_id: "wedding-1".to_string(),
                title: "Done task".to_string(),
                description: String::new(),
                priority: TaskPriority::Low,
                status: TaskStatus::Done,
                due_date: None,
                assigned_to: String::new(),
                cost: None,
                created_at: now,
                updated_at: now,
            },
            Task {
                id: "t2".to_string(),
                wedding_id: "wedding-1".to_string(),
                title: "Open task".to_string(),
                description: String::new(),
                priority: TaskPriority::Low,
                status: TaskStatus::InProgress,
                due_date: None,
                assigned_to: String::new(),
                cost: None,
                created_at: now,
                updated_at: now,
            },
        ];

        let snapshot = capture_weekly_snapshot("wedding-1", &guests, &items, &tasks, today);
        assert_eq!(snapshot.week_number, today.iso_week().week());
        assert_eq!(snapshot.confirmed_count, 2);
        assert_eq!(snapshot.pending_count, 1);
        // declined guests appear in neither count
        assert_eq!(snapshot.spending_to_date, Decimal::from(4_500));
        assert_eq!(snapshot.tasks_completed, 1);
        assert_eq!(snapshot.tasks_pending, 1);
    }

    #[test]
    fn test_pledge_summary() {
        let pledges = vec![
            Pledge {
                id: "p1".to_string(),
                wedding_id: "wedding-1".to_string(),
                guest_id: None,
                pledged_amount: Decimal::from(1_000),
                paid_amount: Decimal::from(1_000),
                payment_status: PledgeStatus::Paid,
                created_at: Utc::now(),
            },
            Pledge {
                id: "p2".to_string(),
                wedding_id: "wedding-1".to_string(),
                guest_id: None,
                pledged_amount: Decimal::from(600),
                paid_amount: Decimal::from(200),
                payment_status: PledgeStatus::Partial,
                created_at: Utc::now(),
            },
        ];

        let summary = summarize_pledges(&pledges);
        assert_eq!(summary.total_pledged, Decimal::from(1_600));
        assert_eq!(summary.total_paid, Decimal::from(1_200));
        assert_eq!(summary.total_balance, Decimal::from(400));
        assert_eq!(summary.collection_rate, 75.0);
        assert_eq!(summary.status_breakdown["paid"], 1);
        assert_eq!(summary.status_breakdown["partial"], 1);
        assert_eq!(summary.status_breakdown["pledged"], 0);
        assert_eq!(summary.total_pledges, 2);
    }

    #[test]
    fn test_pledge_summary_empty() {
        let summary = summarize_pledges(&[]);
        assert_eq!(summary.collection_rate, 0.0);
        assert_eq!(summary.total_pledges, 0);
        assert_eq!(summary.total_balance, Decimal::ZERO);
    }
}
