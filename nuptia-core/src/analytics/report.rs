//! Client-facing report shapes derived from a computed snapshot.
//!
//! These are presentation rollups only; all numbers come straight from
//! [`AnalyticsSnapshot`] and friends, never from storage.

use crate::analytics::engagement::PledgeSummary;
use crate::types::{AnalyticsSnapshot, EngagementMetrics, MilestoneStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// The five named health scores reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub budget_health: f64,
    pub task_health: f64,
    pub guest_health: f64,
    pub planning_health: f64,
    pub overall_health: f64,
}

impl AnalyticsSnapshot {
    /// The nested health-report object for client responses.
    pub fn health_report(&self) -> HealthReport {
        HealthReport {
            budget_health: self.budget_health_score,
            task_health: self.task_health_score,
            guest_health: self.guest_health_score,
            planning_health: self.planning_health_score,
            overall_health: self.overall_health_score,
        }
    }
}

/// Advisory label for a budget health score.
pub fn budget_status_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "On track"
    } else {
        "Watch spending"
    }
}

/// Advisory label for a task health score.
pub fn task_status_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "On track"
    } else {
        "Behind schedule"
    }
}

/// Advisory label for a guest health score.
pub fn guest_status_label(score: f64) -> &'static str {
    if score >= 70.0 {
        "Good response"
    } else {
        "Follow up needed"
    }
}

/// Advisory label for a planning health score.
pub fn planning_status_label(score: f64) -> &'static str {
    if score >= 70.0 {
        "Good progress"
    } else {
        "Catch up on milestones"
    }
}

/// Advisory label for the overall health score.
pub fn overall_status_label(score: f64) -> &'static str {
    if score >= 85.0 {
        "Excellent"
    } else if score >= 70.0 {
        "Good"
    } else {
        "Needs Attention"
    }
}

/// Actual-versus-estimated comparison across the three tracked dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonData {
    pub budget: BudgetComparison,
    pub guests: GuestComparison,
    pub tasks: TaskComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub estimated: Decimal,
    pub actual: Decimal,
    pub variance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestComparison {
    pub invited: i64,
    pub confirmed: i64,
    pub pending: i64,
    pub declined: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskComparison {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub overdue: i64,
    pub completion_percentage: f64,
}

impl ComparisonData {
    pub fn from_snapshot(snapshot: &AnalyticsSnapshot) -> Self {
        Self {
            budget: BudgetComparison {
                estimated: snapshot.total_estimated_budget,
                actual: snapshot.total_actual_spending,
                variance: snapshot.budget_variance,
            },
            guests: GuestComparison {
                invited: snapshot.total_invitations_sent,
                confirmed: snapshot.total_confirmed,
                pending: snapshot.total_pending,
                declined: snapshot.total_declined,
            },
            tasks: TaskComparison {
                total: snapshot.total_tasks,
                completed: snapshot.completed_tasks,
                pending: snapshot.pending_tasks,
                overdue: snapshot.overdue_tasks,
                completion_percentage: snapshot.completion_percentage,
            },
        }
    }
}

/// One row of the per-category budget breakdown report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdownRow {
    pub category: String,
    pub estimated: Decimal,
    pub actual: Decimal,
    /// Money left against the estimate (estimated minus actual)
    pub variance: Decimal,
    /// Share of the total estimated budget, as a percentage
    pub percentage_of_budget: f64,
    pub item_count: i64,
}

/// Expand the snapshot's category map into report rows with percentages.
pub fn category_breakdown_report(snapshot: &AnalyticsSnapshot) -> Vec<CategoryBreakdownRow> {
    let total = snapshot.total_estimated_budget;
    snapshot
        .budget_category_breakdown
        .iter()
        .map(|(category, data)| {
            let percentage_of_budget = if total > Decimal::ZERO {
                data.estimated.to_f64().unwrap_or(0.0) / total.to_f64().unwrap_or(1.0) * 100.0
            } else {
                0.0
            };
            CategoryBreakdownRow {
                category: category.clone(),
                estimated: data.estimated,
                actual: data.actual,
                variance: data.estimated - data.actual,
                percentage_of_budget,
                item_count: data.item_count,
            }
        })
        .collect()
}

/// Milestone completion rollup with countdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStatusReport {
    pub events: BTreeMap<String, MilestoneStatus>,
    pub total_events: i64,
    pub completed_events: i64,
    pub completion_rate: f64,
    pub days_until_wedding: i64,
    pub weeks_until_wedding: i64,
}

impl TimelineStatusReport {
    pub fn from_snapshot(snapshot: &AnalyticsSnapshot) -> Self {
        let total_events = snapshot.completion_by_milestone.len() as i64;
        let completed_events = snapshot
            .completion_by_milestone
            .values()
            .filter(|m| m.completed)
            .count() as i64;
        let completion_rate = if total_events > 0 {
            completed_events as f64 / total_events as f64 * 100.0
        } else {
            0.0
        };

        Self {
            events: snapshot.completion_by_milestone.clone(),
            total_events,
            completed_events,
            completion_rate,
            days_until_wedding: snapshot.days_until_wedding,
            weeks_until_wedding: snapshot.weeks_until_wedding,
        }
    }
}

/// The full analytics response for one wedding: snapshot, engagement,
/// comparison, health report, and pledge summary.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub analytics: AnalyticsSnapshot,
    pub engagement: EngagementMetrics,
    pub comparison: ComparisonData,
    pub health_report: HealthReport,
    pub pledges: PledgeSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryBreakdown;
    use chrono::Utc;

    fn snapshot() -> AnalyticsSnapshot {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            "catering".to_string(),
            CategoryBreakdown {
                estimated: Decimal::from(300),
                actual: Decimal::from(250),
                item_count: 2,
            },
        );
        breakdown.insert(
            "venue".to_string(),
            CategoryBreakdown {
                estimated: Decimal::from(700),
                actual: Decimal::from(800),
                item_count: 1,
            },
        );

        let mut milestones = BTreeMap::new();
        milestones.insert(
            "Venue Booking".to_string(),
            MilestoneStatus {
                completed: true,
                event_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                days_until_event: -90,
            },
        );
        milestones.insert(
            "Rehearsal".to_string(),
            MilestoneStatus {
                completed: false,
                event_date: chrono::NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
                days_until_event: 92,
            },
        );

        AnalyticsSnapshot {
            wedding_id: "wedding-1".to_string(),
            computed_at: Utc::now(),
            total_invitations_sent: 10,
            total_confirmed: 6,
            total_pending: 3,
            total_declined: 1,
            average_guests_per_invitation: 1.5,
            total_estimated_budget: Decimal::from(1_000),
            total_actual_spending: Decimal::from(1_050),
            budget_variance: Decimal::from(50),
            budget_category_breakdown: breakdown,
            total_tasks: 4,
            completed_tasks: 2,
            pending_tasks: 2,
            overdue_tasks: 1,
            completion_percentage: 50.0,
            total_vendors: 3,
            vendors_booked: 1,
            average_vendor_quote: Decimal::from(750),
            total_vendor_cost: Decimal::from(1_400),
            days_until_wedding: 100,
            weeks_until_wedding: 14,
            completion_by_milestone: milestones,
            budget_health_score: 95.0,
            task_health_score: 45.0,
            guest_health_score: 70.0,
            planning_health_score: 50.0,
            overall_health_score: 65.0,
        }
    }

    #[test]
    fn test_health_report_mirrors_scores() {
        let snapshot = snapshot();
        let report = snapshot.health_report();
        assert_eq!(report.budget_health, 95.0);
        assert_eq!(report.task_health, 45.0);
        assert_eq!(report.guest_health, 70.0);
        assert_eq!(report.planning_health, 50.0);
        assert_eq!(report.overall_health, 65.0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(budget_status_label(95.0), "On track");
        assert_eq!(budget_status_label(60.0), "Watch spending");
        assert_eq!(task_status_label(45.0), "Behind schedule");
        assert_eq!(guest_status_label(70.0), "Good response");
        assert_eq!(guest_status_label(69.9), "Follow up needed");
        assert_eq!(planning_status_label(50.0), "Catch up on milestones");
        assert_eq!(overall_status_label(90.0), "Excellent");
        assert_eq!(overall_status_label(72.0), "Good");
        assert_eq!(overall_status_label(65.0), "Needs Attention");
    }

    #[test]
    fn test_comparison_from_snapshot() {
        let comparison = ComparisonData::from_snapshot(&snapshot());
        assert_eq!(comparison.budget.variance, Decimal::from(50));
        assert_eq!(comparison.guests.invited, 10);
        assert_eq!(comparison.tasks.overdue, 1);
        assert_eq!(comparison.tasks.completion_percentage, 50.0);
    }

    #[test]
    fn test_category_breakdown_report() {
        let rows = category_breakdown_report(&snapshot());
        assert_eq!(rows.len(), 2);

        let catering = rows.iter().find(|r| r.category == "catering").unwrap();
        assert_eq!(catering.variance, Decimal::from(50));
        assert_eq!(catering.percentage_of_budget, 30.0);
        assert_eq!(catering.item_count, 2);

        let venue = rows.iter().find(|r| r.category == "venue").unwrap();
        assert_eq!(venue.variance, Decimal::from(-100));
        assert_eq!(venue.percentage_of_budget, 70.0);
    }

    #[test]
    fn test_category_breakdown_with_zero_total() {
        let mut s = snapshot();
        s.total_estimated_budget = Decimal::ZERO;
        let rows = category_breakdown_report(&s);
        assert!(rows.iter().all(|r| r.percentage_of_budget == 0.0));
    }

    #[test]
    fn test_timeline_status_report() {
        let report = TimelineStatusReport::from_snapshot(&snapshot());
        assert_eq!(report.total_events, 2);
        assert_eq!(report.completed_events, 1);
        assert_eq!(report.completion_rate, 50.0);
        assert_eq!(report.days_until_wedding, 100);
    }
}
