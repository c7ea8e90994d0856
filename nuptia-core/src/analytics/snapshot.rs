//! Snapshot computation: pure aggregation over loaded collections.
//!
//! Everything in this module is a pure function of the records passed in
//! plus `today`; nothing here touches storage. The engine loads the
//! collections, calls [`compute_snapshot`], and persists the result.

use crate::types::{
    AnalyticsSnapshot, BudgetItem, CategoryBreakdown, Guest, MilestoneStatus, RsvpStatus, Task,
    TimelineEvent, Vendor, VendorStatus, Wedding,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Compute the full analytics snapshot for a wedding from its collections.
///
/// `today` drives every date-relative figure (overdue tasks, countdowns,
/// days-until-milestone); callers outside tests pass the current date.
pub fn compute_snapshot(
    wedding: &Wedding,
    guests: &[Guest],
    budget_items: &[BudgetItem],
    tasks: &[Task],
    vendors: &[Vendor],
    events: &[TimelineEvent],
    today: NaiveDate,
) -> AnalyticsSnapshot {
    let guest = summarize_guests(guests);
    let budget = summarize_budget(budget_items);
    let task = summarize_tasks(tasks, today);
    let vendor = summarize_vendors(vendors);
    let timeline = summarize_timeline(wedding.wedding_date, events, today);
    let health = health_scores(&guest, &budget, &task, &timeline);

    AnalyticsSnapshot {
        wedding_id: wedding.id.clone(),
        computed_at: Utc::now(),

        total_invitations_sent: guest.total,
        total_confirmed: guest.confirmed,
        total_pending: guest.pending,
        total_declined: guest.declined,
        average_guests_per_invitation: guest.average_party_size,

        total_estimated_budget: budget.total_estimated,
        total_actual_spending: budget.total_actual,
        budget_variance: budget.variance,
        budget_category_breakdown: budget.by_category,

        total_tasks: task.total,
        completed_tasks: task.completed,
        pending_tasks: task.pending,
        overdue_tasks: task.overdue,
        completion_percentage: task.completion_percentage,

        total_vendors: vendor.total,
        vendors_booked: vendor.booked,
        average_vendor_quote: vendor.average_quote,
        total_vendor_cost: vendor.total_cost,

        days_until_wedding: timeline.days_until,
        weeks_until_wedding: timeline.weeks_until,
        completion_by_milestone: timeline.by_milestone,

        budget_health_score: health.budget,
        task_health_score: health.task,
        guest_health_score: health.guest,
        planning_health_score: health.planning,
        overall_health_score: health.overall,
    }
}

// ============================================
// Section aggregations
// ============================================

#[derive(Debug)]
struct GuestTotals {
    total: i64,
    confirmed: i64,
    pending: i64,
    declined: i64,
    average_party_size: f64,
}

fn summarize_guests(guests: &[Guest]) -> GuestTotals {
    let mut confirmed = 0i64;
    let mut pending = 0i64;
    let mut declined = 0i64;
    let mut party_total = 0i64;

    for guest in guests {
        match guest.rsvp_status {
            RsvpStatus::Confirmed => confirmed += 1,
            RsvpStatus::Pending => pending += 1,
            RsvpStatus::Declined => declined += 1,
        }
        party_total += guest.party_size;
    }

    let total = guests.len() as i64;
    let average_party_size = if total > 0 {
        party_total as f64 / total as f64
    } else {
        1.0
    };

    GuestTotals {
        total,
        confirmed,
        pending,
        declined,
        average_party_size,
    }
}

#[derive(Debug)]
struct BudgetTotals {
    total_estimated: Decimal,
    total_actual: Decimal,
    variance: Decimal,
    by_category: BTreeMap<String, CategoryBreakdown>,
}

fn summarize_budget(items: &[BudgetItem]) -> BudgetTotals {
    let mut total_estimated = Decimal::ZERO;
    let mut total_actual = Decimal::ZERO;
    let mut by_category: BTreeMap<String, CategoryBreakdown> = BTreeMap::new();

    for item in items {
        let actual = item.actual_or_zero();
        total_estimated += item.estimated_cost;
        total_actual += actual;

        let entry = by_category
            .entry(item.category.as_str().to_string())
            .or_default();
        entry.estimated += item.estimated_cost;
        entry.actual += actual;
        entry.item_count += 1;
    }

    BudgetTotals {
        total_estimated,
        total_actual,
        // Positive variance means overspend
        variance: total_actual - total_estimated,
        by_category,
    }
}

#[derive(Debug)]
struct TaskTotals {
    total: i64,
    completed: i64,
    pending: i64,
    overdue: i64,
    completion_percentage: f64,
}

fn summarize_tasks(tasks: &[Task], today: NaiveDate) -> TaskTotals {
    let mut completed = 0i64;
    let mut pending = 0i64;
    let mut overdue = 0i64;

    for task in tasks {
        if task.status.is_open() {
            pending += 1;
        } else {
            completed += 1;
        }
        if task.is_overdue(today) {
            overdue += 1;
        }
    }

    let total = tasks.len() as i64;
    let completion_percentage = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    TaskTotals {
        total,
        completed,
        pending,
        overdue,
        completion_percentage,
    }
}

#[derive(Debug)]
struct VendorTotals {
    total: i64,
    booked: i64,
    average_quote: Decimal,
    total_cost: Decimal,
}

fn summarize_vendors(vendors: &[Vendor]) -> VendorTotals {
    let mut booked = 0i64;
    let mut quote_sum = Decimal::ZERO;
    let mut quote_count = 0i64;
    let mut total_cost = Decimal::ZERO;

    for vendor in vendors {
        if vendor.status == VendorStatus::Booked {
            booked += 1;
        }
        if let Some(quote) = vendor.quote {
            quote_sum += quote;
            quote_count += 1;
        }
        total_cost += vendor.committed_cost();
    }

    let average_quote = if quote_count > 0 {
        quote_sum / Decimal::from(quote_count)
    } else {
        Decimal::ZERO
    };

    VendorTotals {
        total: vendors.len() as i64,
        booked,
        average_quote,
        total_cost,
    }
}

#[derive(Debug)]
struct TimelineTotals {
    days_until: i64,
    weeks_until: i64,
    by_milestone: BTreeMap<String, MilestoneStatus>,
}

fn summarize_timeline(
    wedding_date: NaiveDate,
    events: &[TimelineEvent],
    today: NaiveDate,
) -> TimelineTotals {
    let days_until = (wedding_date - today).num_days().max(0);
    let weeks_until = days_until / 7;

    // Walk events in date order; a later event of the same milestone type
    // replaces an earlier one in the map.
    let mut ordered: Vec<&TimelineEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.event_date);

    let mut by_milestone = BTreeMap::new();
    for event in ordered {
        by_milestone.insert(
            event.event_type.display_name().to_string(),
            MilestoneStatus {
                completed: event.is_completed,
                event_date: event.event_date,
                days_until_event: (event.event_date - today).num_days(),
            },
        );
    }

    TimelineTotals {
        days_until,
        weeks_until,
        by_milestone,
    }
}

// ============================================
// Health scores
// ============================================

#[derive(Debug)]
struct HealthScores {
    budget: f64,
    task: f64,
    guest: f64,
    planning: f64,
    overall: f64,
}

/// Score each planning dimension on a 0-100 scale.
///
/// Every ratio with a zero denominator defaults to 100 ("nothing to worry
/// about yet"); no score can ever be NaN. The budget score has no upper
/// clamp: spending under estimate yields scores above 100. Stakeholders
/// have been flagged on this; change it only together with the mobile
/// client's health gauge.
fn health_scores(
    guest: &GuestTotals,
    budget: &BudgetTotals,
    task: &TaskTotals,
    timeline: &TimelineTotals,
) -> HealthScores {
    // Budget health: 100 on/under budget, falling linearly with overspend
    let budget_score = if budget.total_estimated > Decimal::ZERO {
        let ratio = budget.total_actual.to_f64().unwrap_or(0.0)
            / budget.total_estimated.to_f64().unwrap_or(1.0);
        (100.0 - (ratio - 1.0) * 100.0).max(0.0)
    } else {
        100.0
    };

    // Task health: completion minus an overdue penalty of up to 20 points
    let task_score = if task.total > 0 {
        let overdue_penalty = task.overdue as f64 / task.total as f64 * 20.0;
        (task.completion_percentage - overdue_penalty).max(0.0)
    } else {
        100.0
    };

    // Guest health: response rate, counting declines as responses
    let guest_score = if guest.total > 0 {
        (guest.confirmed + guest.declined) as f64 / guest.total as f64 * 100.0
    } else {
        100.0
    };

    // Planning health: share of milestones completed
    let planning_score = if !timeline.by_milestone.is_empty() {
        let completed = timeline.by_milestone.values().filter(|m| m.completed).count();
        completed as f64 / timeline.by_milestone.len() as f64 * 100.0
    } else {
        100.0
    };

    HealthScores {
        budget: budget_score,
        task: task_score,
        guest: guest_score,
        planning: planning_score,
        overall: (budget_score + task_score + guest_score + planning_score) / 4.0,
    }
}
