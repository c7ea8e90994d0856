//! nuptia - CLI for wedding planning analytics
//!
//! Computes analytics reports, weekly trend snapshots, and engagement
//! metrics for weddings stored in the local database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nuptia_core::analytics::{
    budget_status_label, category_breakdown_report, guest_status_label, overall_status_label,
    planning_status_label, task_status_label, AnalyticsEngine,
};
use nuptia_core::{Config, Database};

#[derive(Parser)]
#[command(name = "nuptia")]
#[command(about = "Wedding planning analytics")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute and print the full analytics report for a wedding
    Report {
        /// Wedding ID (partial match supported)
        wedding: String,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Capture a weekly trend snapshot for a wedding
    Snapshot {
        /// Wedding ID (partial match supported)
        wedding: String,
    },

    /// Print the weekly trend history for a wedding
    Trend {
        /// Wedding ID (partial match supported)
        wedding: String,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List weddings in the database
    List,

    /// Seed a demonstration wedding with sample data
    SeedDemo,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        nuptia_core::logging::init(&config.logging).context("failed to initialize logging")?;

    // Open database
    let db_path = config.database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let engine = AnalyticsEngine::new();

    match args.command {
        Command::Report { wedding, format } => {
            let wedding_id = resolve_wedding_id(&db, &wedding)?;
            let report = engine
                .full_report(&wedding_id, &db)
                .context("failed to compute analytics")?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_text_report(&db, &wedding_id, &report)?;
            }
        }

        Command::Snapshot { wedding } => {
            let wedding_id = resolve_wedding_id(&db, &wedding)?;
            let snapshot = engine
                .create_weekly_snapshot(&wedding_id, &db)
                .context("failed to capture weekly snapshot")?;

            println!(
                "Captured snapshot #{} for week {}: {} confirmed, {} pending, {} spent",
                snapshot.id,
                snapshot.week_number,
                snapshot.confirmed_count,
                snapshot.pending_count,
                snapshot.spending_to_date
            );
        }

        Command::Trend { wedding, format } => {
            let wedding_id = resolve_wedding_id(&db, &wedding)?;
            let snapshots = db
                .list_weekly_snapshots(&wedding_id)
                .context("failed to load weekly snapshots")?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else if snapshots.is_empty() {
                println!("No weekly snapshots yet. Run 'nuptia snapshot' to capture one.");
            } else {
                println!("Week  Confirmed  Pending  Done  Open  Spent");
                for s in &snapshots {
                    println!(
                        "{:>4}  {:>9}  {:>7}  {:>4}  {:>4}  {}",
                        s.week_number,
                        s.confirmed_count,
                        s.pending_count,
                        s.tasks_completed,
                        s.tasks_pending,
                        s.spending_to_date
                    );
                }
            }
        }

        Command::List => {
            let summaries = db
                .list_wedding_summaries()
                .context("failed to list weddings")?;

            if summaries.is_empty() {
                println!("No weddings in database.");
                println!("Run 'nuptia seed-demo' to create a sample wedding.");
                return Ok(());
            }

            for summary in summaries {
                let short_id = &summary.id[..8.min(summary.id.len())];
                println!(
                    "{}  {}  {} ({}) - {} guests, {} tasks",
                    short_id,
                    summary.wedding_date,
                    summary.display_name,
                    summary.status,
                    summary.guest_count,
                    summary.task_count
                );
            }
        }

        Command::SeedDemo => {
            let wedding_id = seed_demo(&db)?;
            println!("Seeded demo wedding: {}", wedding_id);
            println!("Try: nuptia report {}", &wedding_id[..8]);
        }
    }

    Ok(())
}

/// Resolve a possibly-partial wedding ID to a full one.
fn resolve_wedding_id(db: &Database, query: &str) -> Result<String> {
    // Try exact match first
    if db.get_wedding(query)?.is_some() {
        return Ok(query.to_string());
    }

    // Try partial match
    let weddings = db.list_weddings()?;
    let mut matches: Vec<_> = weddings
        .into_iter()
        .filter(|w| w.id.contains(query))
        .collect();

    match matches.len() {
        0 => anyhow::bail!("No wedding found matching '{}'", query),
        1 => Ok(matches.remove(0).id),
        n => anyhow::bail!("{} weddings match '{}', be more specific", n, query),
    }
}

fn print_text_report(
    db: &Database,
    wedding_id: &str,
    report: &nuptia_core::analytics::AnalyticsReport,
) -> Result<()> {
    let wedding = db.get_wedding(wedding_id)?;
    let (name, venue) = wedding
        .map(|w| (w.display_name(), w.venue))
        .unwrap_or_else(|| ("(unknown)".to_string(), String::new()));

    let a = &report.analytics;
    let h = &report.health_report;

    println!("{} at {}", name, venue);
    println!(
        "{} days to go ({} weeks)",
        a.days_until_wedding, a.weeks_until_wedding
    );
    println!();

    println!(
        "Overall health: {:.1} ({})",
        h.overall_health,
        overall_status_label(h.overall_health)
    );
    println!(
        "  budget   {:>6.1}  {}",
        h.budget_health,
        budget_status_label(h.budget_health)
    );
    println!(
        "  tasks    {:>6.1}  {}",
        h.task_health,
        task_status_label(h.task_health)
    );
    println!(
        "  guests   {:>6.1}  {}",
        h.guest_health,
        guest_status_label(h.guest_health)
    );
    println!(
        "  planning {:>6.1}  {}",
        h.planning_health,
        planning_status_label(h.planning_health)
    );
    println!();

    println!(
        "Guests: {} invited, {} confirmed, {} pending, {} declined (avg party {:.1})",
        a.total_invitations_sent,
        a.total_confirmed,
        a.total_pending,
        a.total_declined,
        a.average_guests_per_invitation
    );
    println!(
        "Budget: {} estimated, {} spent, variance {}",
        a.total_estimated_budget, a.total_actual_spending, a.budget_variance
    );
    for row in category_breakdown_report(a) {
        println!(
            "  {:<15} {:>10} est  {:>10} actual  {:>5.1}% of budget ({} items)",
            row.category, row.estimated, row.actual, row.percentage_of_budget, row.item_count
        );
    }
    println!(
        "Tasks: {}/{} done ({:.0}%), {} overdue",
        a.completed_tasks, a.total_tasks, a.completion_percentage, a.overdue_tasks
    );
    println!(
        "Vendors: {}/{} booked, avg quote {}, committed {}",
        a.vendors_booked, a.total_vendors, a.average_vendor_quote, a.total_vendor_cost
    );

    if !a.completion_by_milestone.is_empty() {
        println!("Milestones:");
        for (label, status) in &a.completion_by_milestone {
            let mark = if status.completed { "x" } else { " " };
            println!(
                "  [{}] {:<18} {}  ({} days)",
                mark, label, status.event_date, status.days_until_event
            );
        }
    }

    if report.pledges.total_pledges > 0 {
        println!(
            "Pledges: {} pledged, {} collected ({:.0}%), {} outstanding",
            report.pledges.total_pledged,
            report.pledges.total_paid,
            report.pledges.collection_rate,
            report.pledges.total_balance
        );
    }

    println!();
    println!(
        "Engagement: {:.0}% responded, {:.0}% with dietary notes",
        report.engagement.rsvp_response_rate, report.engagement.dietary_requirements_percentage
    );

    Ok(())
}

/// Populate a demonstration wedding so every subcommand has data to show.
fn seed_demo(db: &Database) -> Result<String> {
    use chrono::{Duration, Local, Utc};
    use nuptia_core::types::*;
    use rust_decimal::Decimal;

    let today = Local::now().date_naive();
    let wedding = Wedding::new(
        "Amina",
        "Jabari",
        today + Duration::days(120),
        "Lakeside Gardens",
        Decimal::from(30_000),
    );
    db.upsert_wedding(&wedding)?;

    let new_id = || uuid::Uuid::new_v4().to_string();

    let guests = [
        ("Neema", Relationship::Family, RsvpStatus::Confirmed, 2, "vegetarian"),
        ("Baraka", Relationship::Family, RsvpStatus::Confirmed, 4, ""),
        ("Zuri", Relationship::Friend, RsvpStatus::Confirmed, 1, "vegan"),
        ("Imani", Relationship::Friend, RsvpStatus::Pending, 2, ""),
        ("Kito", Relationship::Colleague, RsvpStatus::Pending, 1, ""),
        ("Dalila", Relationship::Other, RsvpStatus::Declined, 2, ""),
    ];
    for (name, relationship, rsvp, party_size, dietary) in guests {
        db.insert_guest(&Guest {
            id: new_id(),
            wedding_id: wedding.id.clone(),
            name: name.to_string(),
            phone: String::new(),
            email: format!("{}@example.com", name.to_lowercase()),
            relationship,
            rsvp_status: rsvp,
            party_size,
            dietary_notes: dietary.to_string(),
            created_at: Utc::now(),
        })?;
    }

    let items = [
        (BudgetCategory::Venue, "Hall hire", 8_000, Some(8_000)),
        (BudgetCategory::Catering, "Dinner service", 6_000, Some(6_500)),
        (BudgetCategory::Photography, "Photographer", 2_500, None),
        (BudgetCategory::Music, "Live band", 1_800, Some(1_800)),
        (BudgetCategory::Attire, "Dress and suits", 3_000, Some(2_400)),
    ];
    for (category, name, estimated, actual) in items {
        db.insert_budget_item(&BudgetItem {
            id: new_id(),
            wedding_id: wedding.id.clone(),
            category,
            item_name: name.to_string(),
            estimated_cost: Decimal::from(estimated),
            actual_cost: actual.map(Decimal::from),
            notes: String::new(),
            created_at: Utc::now(),
        })?;
    }

    let tasks = [
        ("Book venue", TaskStatus::Done, None),
        ("Send save-the-dates", TaskStatus::Done, None),
        ("Order invitations", TaskStatus::InProgress, Some(-7i64)),
        ("Finalize menu", TaskStatus::Todo, Some(21)),
        ("Arrange transport", TaskStatus::Todo, Some(45)),
    ];
    for (title, status, due_in) in tasks {
        let now = Utc::now();
        db.insert_task(&Task {
            id: new_id(),
            wedding_id: wedding.id.clone(),
            title: title.to_string(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status,
            due_date: due_in.map(|d| today + Duration::days(d)),
            assigned_to: String::new(),
            cost: None,
            created_at: now,
            updated_at: now,
        })?;
    }

    let vendors = [
        ("Lakeside Gardens", VendorType::Venue, VendorStatus::Booked, Some(8_000i64), Some(8_000i64)),
        ("Savor Catering", VendorType::Catering, VendorStatus::Booked, Some(6_000), None),
        ("Lens & Light", VendorType::Photography, VendorStatus::Negotiating, Some(2_500), None),
        ("Brass Section", VendorType::Music, VendorStatus::Inquiry, None, None),
    ];
    for (name, vendor_type, status, quote, final_amount) in vendors {
        db.insert_vendor(&Vendor {
            id: new_id(),
            wedding_id: wedding.id.clone(),
            name: name.to_string(),
            vendor_type,
            status,
            quote: quote.map(Decimal::from),
            deposit: None,
            final_amount: final_amount.map(Decimal::from),
            contact_email: String::new(),
            created_at: Utc::now(),
        })?;
    }

    let events = [
        (MilestoneType::VenueBooking, -60i64, true),
        (MilestoneType::SaveTheDates, -30, true),
        (MilestoneType::InvitationsSent, 14, false),
        (MilestoneType::MenuTasting, 30, false),
        (MilestoneType::FinalHeadcount, 100, false),
    ];
    for (event_type, days, completed) in events {
        db.insert_timeline_event(&TimelineEvent {
            id: new_id(),
            wedding_id: wedding.id.clone(),
            event_type,
            event_date: today + Duration::days(days),
            is_completed: completed,
            created_at: Utc::now(),
        })?;
    }

    db.insert_pledge(&Pledge {
        id: new_id(),
        wedding_id: wedding.id.clone(),
        guest_id: None,
        pledged_amount: Decimal::from(1_000),
        paid_amount: Decimal::from(400),
        payment_status: PledgeStatus::Partial,
        created_at: Utc::now(),
    })?;

    tracing::info!(wedding_id = wedding.id, "Seeded demo wedding");

    Ok(wedding.id)
}
