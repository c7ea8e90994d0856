//! Database repository layer
//!
//! Provides query and insert operations for all entity types. Layer 1
//! collections are read in full per wedding; Layer 2 records are written
//! with full-replace semantics.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// Wedding summary for list views.
///
/// Contains pre-computed counts to avoid N+1 queries when rendering
/// wedding lists.
#[derive(Debug, Clone)]
pub struct WeddingSummary {
    /// Wedding ID
    pub id: String,
    /// "Partner & Partner"
    pub display_name: String,
    /// Date of the event
    pub wedding_date: NaiveDate,
    /// Lifecycle status
    pub status: WeddingStatus,
    /// Number of guest records
    pub guest_count: i64,
    /// Number of tasks
    pub task_count: i64,
}

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Column helpers
    // ============================================

    fn decimal_from_text(s: String) -> rust_decimal::Decimal {
        s.parse().unwrap_or_default()
    }

    fn optional_decimal(s: Option<String>) -> Option<rust_decimal::Decimal> {
        s.and_then(|s| s.parse().ok())
    }

    fn date_from_text(s: String) -> NaiveDate {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive())
    }

    fn datetime_from_text(s: String) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    // ============================================
    // Wedding operations
    // ============================================

    /// Insert or update a wedding
    pub fn upsert_wedding(&self, wedding: &Wedding) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO weddings (id, partner_one, partner_two, wedding_date, venue,
                                  total_budget, status, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                partner_one = excluded.partner_one,
                partner_two = excluded.partner_two,
                wedding_date = excluded.wedding_date,
                venue = excluded.venue,
                total_budget = excluded.total_budget,
                status = excluded.status,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
            params![
                wedding.id,
                wedding.partner_one,
                wedding.partner_two,
                wedding.wedding_date.to_string(),
                wedding.venue,
                wedding.total_budget.to_string(),
                wedding.status.as_str(),
                wedding.description,
                wedding.created_at.to_rfc3339(),
                wedding.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a wedding by ID
    pub fn get_wedding(&self, id: &str) -> Result<Option<Wedding>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM weddings WHERE id = ?", [id], |row| {
            Self::row_to_wedding(row)
        })
        .optional()
        .map_err(Error::from)
    }

    /// List all weddings, most recent event first
    pub fn list_weddings(&self) -> Result<Vec<Wedding>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM weddings ORDER BY wedding_date DESC")?;
        let weddings = stmt
            .query_map([], Self::row_to_wedding)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(weddings)
    }

    /// List wedding summaries with pre-computed guest/task counts
    pub fn list_wedding_summaries(&self) -> Result<Vec<WeddingSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT w.id, w.partner_one, w.partner_two, w.wedding_date, w.status,
                   (SELECT COUNT(*) FROM guests g WHERE g.wedding_id = w.id) AS guest_count,
                   (SELECT COUNT(*) FROM tasks t WHERE t.wedding_id = w.id) AS task_count
            FROM weddings w
            ORDER BY w.wedding_date DESC
            "#,
        )?;
        let summaries = stmt
            .query_map([], |row| {
                let partner_one: String = row.get(1)?;
                let partner_two: String = row.get(2)?;
                let date_str: String = row.get(3)?;
                let status_str: String = row.get(4)?;
                Ok(WeddingSummary {
                    id: row.get(0)?,
                    display_name: format!("{} & {}", partner_one, partner_two),
                    wedding_date: Self::date_from_text(date_str),
                    status: status_str.parse().unwrap_or_default(),
                    guest_count: row.get(5)?,
                    task_count: row.get(6)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(summaries)
    }

    /// Delete a wedding and everything it owns, derived records included
    pub fn delete_wedding(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM engagement_metrics WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM weekly_snapshots WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM analytics_snapshots WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM pledges WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM timeline_events WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM vendors WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM budget_items WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM tasks WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM guests WHERE wedding_id = ?", [id])?;
        conn.execute("DELETE FROM weddings WHERE id = ?", [id])?;
        Ok(())
    }

    fn row_to_wedding(row: &Row) -> rusqlite::Result<Wedding> {
        let wedding_date: String = row.get("wedding_date")?;
        let total_budget: String = row.get("total_budget")?;
        let status_str: String = row.get("status")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Wedding {
            id: row.get("id")?,
            partner_one: row.get("partner_one")?,
            partner_two: row.get("partner_two")?,
            wedding_date: Self::date_from_text(wedding_date),
            venue: row.get("venue")?,
            total_budget: Self::decimal_from_text(total_budget),
            status: status_str.parse().unwrap_or_default(),
            description: row.get("description")?,
            created_at: Self::datetime_from_text(created_at),
            updated_at: Self::datetime_from_text(updated_at),
        })
    }

    // ============================================
    // Guest operations
    // ============================================

    /// Insert a guest
    pub fn insert_guest(&self, guest: &Guest) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO guests (id, wedding_id, name, phone, email, relationship,
                                rsvp_status, party_size, dietary_notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                guest.id,
                guest.wedding_id,
                guest.name,
                guest.phone,
                guest.email,
                guest.relationship.as_str(),
                guest.rsvp_status.as_str(),
                guest.party_size,
                guest.dietary_notes,
                guest.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Update a guest's RSVP status
    pub fn set_guest_rsvp(&self, guest_id: &str, status: RsvpStatus) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE guests SET rsvp_status = ?1 WHERE id = ?2",
            params![status.as_str(), guest_id],
        )?;
        Ok(())
    }

    /// List all guests for a wedding
    pub fn list_guests(&self, wedding_id: &str) -> Result<Vec<Guest>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM guests WHERE wedding_id = ? ORDER BY created_at, id",
        )?;
        let guests = stmt
            .query_map([wedding_id], Self::row_to_guest)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(guests)
    }

    fn row_to_guest(row: &Row) -> rusqlite::Result<Guest> {
        let relationship: String = row.get("relationship")?;
        let rsvp_status: String = row.get("rsvp_status")?;
        let created_at: String = row.get("created_at")?;

        Ok(Guest {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            relationship: relationship.parse().unwrap_or(Relationship::Other),
            rsvp_status: rsvp_status.parse().unwrap_or_default(),
            party_size: row.get("party_size")?,
            dietary_notes: row.get("dietary_notes")?,
            created_at: Self::datetime_from_text(created_at),
        })
    }

    // ============================================
    // Task operations
    // ============================================

    /// Insert a task
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO tasks (id, wedding_id, title, description, priority, status,
                               due_date, assigned_to, cost, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                task.id,
                task.wedding_id,
                task.title,
                task.description,
                task.priority.as_str(),
                task.status.as_str(),
                task.due_date.map(|d| d.to_string()),
                task.assigned_to,
                task.cost.map(|c| c.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Update a task's workflow status
    pub fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), task_id],
        )?;
        Ok(())
    }

    /// List all tasks for a wedding
    pub fn list_tasks(&self, wedding_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM tasks WHERE wedding_id = ? ORDER BY created_at, id",
        )?;
        let tasks = stmt
            .query_map([wedding_id], Self::row_to_task)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(tasks)
    }

    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let priority: String = row.get("priority")?;
        let status: String = row.get("status")?;
        let due_date: Option<String> = row.get("due_date")?;
        let cost: Option<String> = row.get("cost")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Task {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            priority: priority.parse().unwrap_or_default(),
            status: status.parse().unwrap_or_default(),
            due_date: due_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            assigned_to: row.get("assigned_to")?,
            cost: Self::optional_decimal(cost),
            created_at: Self::datetime_from_text(created_at),
            updated_at: Self::datetime_from_text(updated_at),
        })
    }

    // ============================================
    // Budget operations
    // ============================================

    /// Insert a budget item
    pub fn insert_budget_item(&self, item: &BudgetItem) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO budget_items (id, wedding_id, category, item_name,
                                      estimated_cost, actual_cost, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                item.id,
                item.wedding_id,
                item.category.as_str(),
                item.item_name,
                item.estimated_cost.to_string(),
                item.actual_cost.map(|c| c.to_string()),
                item.notes,
                item.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Record the actual cost of a budget item once invoiced
    pub fn set_actual_cost(&self, item_id: &str, actual: rust_decimal::Decimal) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE budget_items SET actual_cost = ?1 WHERE id = ?2",
            params![actual.to_string(), item_id],
        )?;
        Ok(())
    }

    /// List all budget items for a wedding
    pub fn list_budget_items(&self, wedding_id: &str) -> Result<Vec<BudgetItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM budget_items WHERE wedding_id = ? ORDER BY created_at, id",
        )?;
        let items = stmt
            .query_map([wedding_id], Self::row_to_budget_item)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(items)
    }

    fn row_to_budget_item(row: &Row) -> rusqlite::Result<BudgetItem> {
        let category: String = row.get("category")?;
        let estimated: String = row.get("estimated_cost")?;
        let actual: Option<String> = row.get("actual_cost")?;
        let created_at: String = row.get("created_at")?;

        Ok(BudgetItem {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            category: category.parse().unwrap_or(BudgetCategory::Other),
            item_name: row.get("item_name")?,
            estimated_cost: Self::decimal_from_text(estimated),
            actual_cost: Self::optional_decimal(actual),
            notes: row.get("notes")?,
            created_at: Self::datetime_from_text(created_at),
        })
    }

    // ============================================
    // Vendor operations
    // ============================================

    /// Insert a vendor
    pub fn insert_vendor(&self, vendor: &Vendor) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO vendors (id, wedding_id, name, vendor_type, status,
                                 quote, deposit, final_amount, contact_email, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                vendor.id,
                vendor.wedding_id,
                vendor.name,
                vendor.vendor_type.as_str(),
                vendor.status.as_str(),
                vendor.quote.map(|q| q.to_string()),
                vendor.deposit.map(|d| d.to_string()),
                vendor.final_amount.map(|f| f.to_string()),
                vendor.contact_email,
                vendor.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List all vendors for a wedding
    pub fn list_vendors(&self, wedding_id: &str) -> Result<Vec<Vendor>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM vendors WHERE wedding_id = ? ORDER BY created_at, id",
        )?;
        let vendors = stmt
            .query_map([wedding_id], Self::row_to_vendor)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(vendors)
    }

    fn row_to_vendor(row: &Row) -> rusqlite::Result<Vendor> {
        let vendor_type: String = row.get("vendor_type")?;
        let status: String = row.get("status")?;
        let quote: Option<String> = row.get("quote")?;
        let deposit: Option<String> = row.get("deposit")?;
        let final_amount: Option<String> = row.get("final_amount")?;
        let created_at: String = row.get("created_at")?;

        Ok(Vendor {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            name: row.get("name")?,
            vendor_type: vendor_type.parse().unwrap_or(VendorType::Other),
            status: status.parse().unwrap_or_default(),
            quote: Self::optional_decimal(quote),
            deposit: Self::optional_decimal(deposit),
            final_amount: Self::optional_decimal(final_amount),
            contact_email: row.get("contact_email")?,
            created_at: Self::datetime_from_text(created_at),
        })
    }

    // ============================================
    // Timeline operations
    // ============================================

    /// Insert a timeline event
    pub fn insert_timeline_event(&self, event: &TimelineEvent) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO timeline_events (id, wedding_id, event_type, event_date,
                                         is_completed, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.id,
                event.wedding_id,
                event.event_type.as_str(),
                event.event_date.to_string(),
                event.is_completed,
                event.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Mark a timeline event completed or not
    pub fn set_timeline_event_completed(&self, event_id: &str, completed: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE timeline_events SET is_completed = ?1 WHERE id = ?2",
            params![completed, event_id],
        )?;
        Ok(())
    }

    /// List all timeline events for a wedding, ordered by date
    pub fn list_timeline_events(&self, wedding_id: &str) -> Result<Vec<TimelineEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM timeline_events WHERE wedding_id = ? ORDER BY event_date, id",
        )?;
        let events = stmt
            .query_map([wedding_id], Self::row_to_timeline_event)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(events)
    }

    fn row_to_timeline_event(row: &Row) -> rusqlite::Result<TimelineEvent> {
        let event_type: String = row.get("event_type")?;
        let event_date: String = row.get("event_date")?;
        let created_at: String = row.get("created_at")?;

        Ok(TimelineEvent {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            event_type: event_type.parse().unwrap_or(MilestoneType::Other),
            event_date: Self::date_from_text(event_date),
            is_completed: row.get("is_completed")?,
            created_at: Self::datetime_from_text(created_at),
        })
    }

    // ============================================
    // Pledge operations
    // ============================================

    /// Insert a pledge
    pub fn insert_pledge(&self, pledge: &Pledge) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO pledges (id, wedding_id, guest_id, pledged_amount,
                                 paid_amount, payment_status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                pledge.id,
                pledge.wedding_id,
                pledge.guest_id,
                pledge.pledged_amount.to_string(),
                pledge.paid_amount.to_string(),
                pledge.payment_status.as_str(),
                pledge.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Record a payment against a pledge, updating the paid amount and status
    pub fn record_pledge_payment(
        &self,
        pledge_id: &str,
        amount: rust_decimal::Decimal,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let current: Option<(String, String)> = conn
            .query_row(
                "SELECT pledged_amount, paid_amount FROM pledges WHERE id = ?",
                [pledge_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((pledged, paid)) = current else {
            return Ok(());
        };
        let pledged = Self::decimal_from_text(pledged);
        let paid = Self::decimal_from_text(paid) + amount;
        let status = if paid >= pledged {
            PledgeStatus::Paid
        } else if paid > rust_decimal::Decimal::ZERO {
            PledgeStatus::Partial
        } else {
            PledgeStatus::Pledged
        };

        conn.execute(
            "UPDATE pledges SET paid_amount = ?1, payment_status = ?2 WHERE id = ?3",
            params![paid.to_string(), status.as_str(), pledge_id],
        )?;
        Ok(())
    }

    /// List all pledges for a wedding
    pub fn list_pledges(&self, wedding_id: &str) -> Result<Vec<Pledge>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM pledges WHERE wedding_id = ? ORDER BY created_at, id",
        )?;
        let pledges = stmt
            .query_map([wedding_id], Self::row_to_pledge)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(pledges)
    }

    fn row_to_pledge(row: &Row) -> rusqlite::Result<Pledge> {
        let pledged: String = row.get("pledged_amount")?;
        let paid: String = row.get("paid_amount")?;
        let status: String = row.get("payment_status")?;
        let created_at: String = row.get("created_at")?;

        Ok(Pledge {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            guest_id: row.get("guest_id")?,
            pledged_amount: Self::decimal_from_text(pledged),
            paid_amount: Self::decimal_from_text(paid),
            payment_status: status.parse().unwrap_or_default(),
            created_at: Self::datetime_from_text(created_at),
        })
    }

    // ============================================
    // Analytics snapshot operations (Layer 2)
    // ============================================

    /// Insert or replace the analytics snapshot for a wedding.
    ///
    /// The write is always a full replace keyed by wedding ID; snapshots
    /// are never patched incrementally.
    pub fn upsert_analytics_snapshot(&self, snapshot: &AnalyticsSnapshot) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT OR REPLACE INTO analytics_snapshots (
                wedding_id, computed_at,
                total_invitations_sent, total_confirmed, total_pending, total_declined,
                average_guests_per_invitation,
                total_estimated_budget, total_actual_spending, budget_variance,
                budget_category_breakdown,
                total_tasks, completed_tasks, pending_tasks, overdue_tasks,
                completion_percentage,
                total_vendors, vendors_booked, average_vendor_quote, total_vendor_cost,
                days_until_wedding, weeks_until_wedding, completion_by_milestone,
                budget_health_score, task_health_score, guest_health_score,
                planning_health_score, overall_health_score
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                    ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28)
            "#,
            params![
                snapshot.wedding_id,
                snapshot.computed_at.to_rfc3339(),
                snapshot.total_invitations_sent,
                snapshot.total_confirmed,
                snapshot.total_pending,
                snapshot.total_declined,
                snapshot.average_guests_per_invitation,
                snapshot.total_estimated_budget.to_string(),
                snapshot.total_actual_spending.to_string(),
                snapshot.budget_variance.to_string(),
                serde_json::to_string(&snapshot.budget_category_breakdown)
                    .unwrap_or_else(|_| "{}".to_string()),
                snapshot.total_tasks,
                snapshot.completed_tasks,
                snapshot.pending_tasks,
                snapshot.overdue_tasks,
                snapshot.completion_percentage,
                snapshot.total_vendors,
                snapshot.vendors_booked,
                snapshot.average_vendor_quote.to_string(),
                snapshot.total_vendor_cost.to_string(),
                snapshot.days_until_wedding,
                snapshot.weeks_until_wedding,
                serde_json::to_string(&snapshot.completion_by_milestone)
                    .unwrap_or_else(|_| "{}".to_string()),
                snapshot.budget_health_score,
                snapshot.task_health_score,
                snapshot.guest_health_score,
                snapshot.planning_health_score,
                snapshot.overall_health_score,
            ],
        )?;
        Ok(())
    }

    /// Get the stored analytics snapshot for a wedding
    pub fn get_analytics_snapshot(&self, wedding_id: &str) -> Result<Option<AnalyticsSnapshot>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM analytics_snapshots WHERE wedding_id = ?",
            [wedding_id],
            Self::row_to_analytics_snapshot,
        )
        .optional()
        .map_err(Error::from)
    }

    fn row_to_analytics_snapshot(row: &Row) -> rusqlite::Result<AnalyticsSnapshot> {
        let computed_at: String = row.get("computed_at")?;
        let estimated: String = row.get("total_estimated_budget")?;
        let actual: String = row.get("total_actual_spending")?;
        let variance: String = row.get("budget_variance")?;
        let category_json: String = row.get("budget_category_breakdown")?;
        let avg_quote: String = row.get("average_vendor_quote")?;
        let vendor_cost: String = row.get("total_vendor_cost")?;
        let milestone_json: String = row.get("completion_by_milestone")?;

        Ok(AnalyticsSnapshot {
            wedding_id: row.get("wedding_id")?,
            computed_at: Self::datetime_from_text(computed_at),
            total_invitations_sent: row.get("total_invitations_sent")?,
            total_confirmed: row.get("total_confirmed")?,
            total_pending: row.get("total_pending")?,
            total_declined: row.get("total_declined")?,
            average_guests_per_invitation: row.get("average_guests_per_invitation")?,
            total_estimated_budget: Self::decimal_from_text(estimated),
            total_actual_spending: Self::decimal_from_text(actual),
            budget_variance: Self::decimal_from_text(variance),
            budget_category_breakdown: serde_json::from_str(&category_json).unwrap_or_default(),
            total_tasks: row.get("total_tasks")?,
            completed_tasks: row.get("completed_tasks")?,
            pending_tasks: row.get("pending_tasks")?,
            overdue_tasks: row.get("overdue_tasks")?,
            completion_percentage: row.get("completion_percentage")?,
            total_vendors: row.get("total_vendors")?,
            vendors_booked: row.get("vendors_booked")?,
            average_vendor_quote: Self::decimal_from_text(avg_quote),
            total_vendor_cost: Self::decimal_from_text(vendor_cost),
            days_until_wedding: row.get("days_until_wedding")?,
            weeks_until_wedding: row.get("weeks_until_wedding")?,
            completion_by_milestone: serde_json::from_str(&milestone_json).unwrap_or_default(),
            budget_health_score: row.get("budget_health_score")?,
            task_health_score: row.get("task_health_score")?,
            guest_health_score: row.get("guest_health_score")?,
            planning_health_score: row.get("planning_health_score")?,
            overall_health_score: row.get("overall_health_score")?,
        })
    }

    // ============================================
    // Weekly snapshot operations (Layer 2)
    // ============================================

    /// Append a weekly snapshot. Always inserts a new row, even when one
    /// already exists for the same ISO week.
    ///
    /// Returns the ID of the inserted record.
    pub fn insert_weekly_snapshot(&self, snapshot: &WeeklySnapshot) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO weekly_snapshots (wedding_id, week_number, confirmed_count,
                                          pending_count, spending_to_date,
                                          tasks_completed, tasks_pending, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                snapshot.wedding_id,
                snapshot.week_number,
                snapshot.confirmed_count,
                snapshot.pending_count,
                snapshot.spending_to_date.to_string(),
                snapshot.tasks_completed,
                snapshot.tasks_pending,
                snapshot.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List weekly snapshots for a wedding, ordered by week then insertion
    pub fn list_weekly_snapshots(&self, wedding_id: &str) -> Result<Vec<WeeklySnapshot>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM weekly_snapshots WHERE wedding_id = ? ORDER BY week_number, id",
        )?;
        let snapshots = stmt
            .query_map([wedding_id], Self::row_to_weekly_snapshot)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(snapshots)
    }

    fn row_to_weekly_snapshot(row: &Row) -> rusqlite::Result<WeeklySnapshot> {
        let spending: String = row.get("spending_to_date")?;
        let created_at: String = row.get("created_at")?;

        Ok(WeeklySnapshot {
            id: row.get("id")?,
            wedding_id: row.get("wedding_id")?,
            week_number: row.get("week_number")?,
            confirmed_count: row.get("confirmed_count")?,
            pending_count: row.get("pending_count")?,
            spending_to_date: Self::decimal_from_text(spending),
            tasks_completed: row.get("tasks_completed")?,
            tasks_pending: row.get("tasks_pending")?,
            created_at: Self::datetime_from_text(created_at),
        })
    }

    // ============================================
    // Engagement metrics operations (Layer 2)
    // ============================================

    /// Insert or replace the engagement metrics for a wedding
    pub fn upsert_engagement_metrics(&self, metrics: &EngagementMetrics) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT OR REPLACE INTO engagement_metrics (
                wedding_id, rsvp_response_rate, relationship_breakdown,
                dietary_requirements_percentage, group_size_distribution, computed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                metrics.wedding_id,
                metrics.rsvp_response_rate,
                serde_json::to_string(&metrics.relationship_breakdown)
                    .unwrap_or_else(|_| "{}".to_string()),
                metrics.dietary_requirements_percentage,
                serde_json::to_string(&metrics.group_size_distribution)
                    .unwrap_or_else(|_| "{}".to_string()),
                metrics.computed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get the stored engagement metrics for a wedding
    pub fn get_engagement_metrics(&self, wedding_id: &str) -> Result<Option<EngagementMetrics>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM engagement_metrics WHERE wedding_id = ?",
            [wedding_id],
            Self::row_to_engagement_metrics,
        )
        .optional()
        .map_err(Error::from)
    }

    fn row_to_engagement_metrics(row: &Row) -> rusqlite::Result<EngagementMetrics> {
        let relationship_json: String = row.get("relationship_breakdown")?;
        let distribution_json: String = row.get("group_size_distribution")?;
        let computed_at: String = row.get("computed_at")?;

        Ok(EngagementMetrics {
            wedding_id: row.get("wedding_id")?,
            rsvp_response_rate: row.get("rsvp_response_rate")?,
            relationship_breakdown: serde_json::from_str(&relationship_json).unwrap_or_default(),
            dietary_requirements_percentage: row.get("dietary_requirements_percentage")?,
            group_size_distribution: serde_json::from_str(&distribution_json).unwrap_or_default(),
            computed_at: Self::datetime_from_text(computed_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_db() -> Database {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.migrate().expect("migrate schema");
        db
    }

    fn test_wedding() -> Wedding {
        Wedding::new(
            "Amina",
            "Jabari",
            NaiveDate::from_ymd_opt(2027, 6, 12).unwrap(),
            "Lakeside Gardens",
            Decimal::new(25_000_00, 2),
        )
    }

    fn test_guest(wedding_id: &str) -> Guest {
        Guest {
            id: uuid::Uuid::new_v4().to_string(),
            wedding_id: wedding_id.to_string(),
            name: "Neema".to_string(),
            phone: String::new(),
            email: "neema@example.com".to_string(),
            relationship: Relationship::Family,
            rsvp_status: RsvpStatus::Confirmed,
            party_size: 2,
            dietary_notes: "vegetarian".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_wedding_roundtrip() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let loaded = db.get_wedding(&wedding.id).unwrap().expect("wedding exists");
        assert_eq!(loaded.partner_one, "Amina");
        assert_eq!(loaded.total_budget, Decimal::new(25_000_00, 2));
        assert_eq!(loaded.status, WeddingStatus::Planning);
        assert_eq!(loaded.wedding_date, wedding.wedding_date);
    }

    #[test]
    fn test_wedding_upsert_replaces() {
        let db = test_db();
        let mut wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        wedding.venue = "City Hall".to_string();
        wedding.status = WeddingStatus::InProgress;
        db.upsert_wedding(&wedding).unwrap();

        let loaded = db.get_wedding(&wedding.id).unwrap().unwrap();
        assert_eq!(loaded.venue, "City Hall");
        assert_eq!(loaded.status, WeddingStatus::InProgress);
        assert_eq!(db.list_weddings().unwrap().len(), 1);
    }

    #[test]
    fn test_guest_roundtrip() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let guest = test_guest(&wedding.id);
        db.insert_guest(&guest).unwrap();

        let guests = db.list_guests(&wedding.id).unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].relationship, Relationship::Family);
        assert_eq!(guests[0].party_size, 2);
        assert_eq!(guests[0].dietary_notes, "vegetarian");
    }

    #[test]
    fn test_set_guest_rsvp() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let mut guest = test_guest(&wedding.id);
        guest.rsvp_status = RsvpStatus::Pending;
        db.insert_guest(&guest).unwrap();

        db.set_guest_rsvp(&guest.id, RsvpStatus::Declined).unwrap();
        let guests = db.list_guests(&wedding.id).unwrap();
        assert_eq!(guests[0].rsvp_status, RsvpStatus::Declined);
    }

    #[test]
    fn test_task_optional_fields() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let now = Utc::now();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            wedding_id: wedding.id.clone(),
            title: "Book photographer".to_string(),
            description: String::new(),
            priority: TaskPriority::High,
            status: TaskStatus::Todo,
            due_date: None,
            assigned_to: String::new(),
            cost: None,
            created_at: now,
            updated_at: now,
        };
        db.insert_task(&task).unwrap();

        let tasks = db.list_tasks(&wedding.id).unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].due_date.is_none());
        assert!(tasks[0].cost.is_none());
        assert_eq!(tasks[0].priority, TaskPriority::High);
    }

    #[test]
    fn test_status_setters() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let now = Utc::now();
        let task = Task {
            id: "t1".to_string(),
            wedding_id: wedding.id.clone(),
            title: "Confirm florist".to_string(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            due_date: None,
            assigned_to: String::new(),
            cost: None,
            created_at: now,
            updated_at: now,
        };
        db.insert_task(&task).unwrap();
        db.set_task_status(&task.id, TaskStatus::Done).unwrap();
        assert_eq!(db.list_tasks(&wedding.id).unwrap()[0].status, TaskStatus::Done);

        let item = BudgetItem {
            id: "b1".to_string(),
            wedding_id: wedding.id.clone(),
            category: BudgetCategory::Decoration,
            item_name: "Flowers".to_string(),
            estimated_cost: Decimal::from(800),
            actual_cost: None,
            notes: String::new(),
            created_at: now,
        };
        db.insert_budget_item(&item).unwrap();
        db.set_actual_cost(&item.id, Decimal::from(750)).unwrap();
        assert_eq!(
            db.list_budget_items(&wedding.id).unwrap()[0].actual_cost,
            Some(Decimal::from(750))
        );

        let event = TimelineEvent {
            id: "e1".to_string(),
            wedding_id: wedding.id.clone(),
            event_type: MilestoneType::MenuTasting,
            event_date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
            is_completed: false,
            created_at: now,
        };
        db.insert_timeline_event(&event).unwrap();
        db.set_timeline_event_completed(&event.id, true).unwrap();
        assert!(db.list_timeline_events(&wedding.id).unwrap()[0].is_completed);
    }

    #[test]
    fn test_weekly_snapshots_append_only() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let snapshot = WeeklySnapshot {
            id: 0,
            wedding_id: wedding.id.clone(),
            week_number: 23,
            confirmed_count: 4,
            pending_count: 6,
            spending_to_date: Decimal::new(1_500_00, 2),
            tasks_completed: 2,
            tasks_pending: 5,
            created_at: Utc::now(),
        };

        let first = db.insert_weekly_snapshot(&snapshot).unwrap();
        let second = db.insert_weekly_snapshot(&snapshot).unwrap();
        assert_ne!(first, second);

        let rows = db.list_weekly_snapshots(&wedding.id).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].week_number, 23);
        assert_eq!(rows[1].week_number, 23);
        assert_eq!(rows[0].spending_to_date, Decimal::new(1_500_00, 2));
    }

    #[test]
    fn test_engagement_metrics_replace() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let mut metrics = EngagementMetrics {
            wedding_id: wedding.id.clone(),
            rsvp_response_rate: 50.0,
            relationship_breakdown: std::collections::BTreeMap::new(),
            dietary_requirements_percentage: 25.0,
            group_size_distribution: std::collections::BTreeMap::new(),
            computed_at: Utc::now(),
        };
        db.upsert_engagement_metrics(&metrics).unwrap();

        metrics.rsvp_response_rate = 75.0;
        db.upsert_engagement_metrics(&metrics).unwrap();

        let loaded = db.get_engagement_metrics(&wedding.id).unwrap().unwrap();
        assert_eq!(loaded.rsvp_response_rate, 75.0);
    }

    #[test]
    fn test_record_pledge_payment_updates_status() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();

        let pledge = Pledge {
            id: uuid::Uuid::new_v4().to_string(),
            wedding_id: wedding.id.clone(),
            guest_id: None,
            pledged_amount: Decimal::new(500_00, 2),
            paid_amount: Decimal::ZERO,
            payment_status: PledgeStatus::Pledged,
            created_at: Utc::now(),
        };
        db.insert_pledge(&pledge).unwrap();

        db.record_pledge_payment(&pledge.id, Decimal::new(200_00, 2))
            .unwrap();
        let pledges = db.list_pledges(&wedding.id).unwrap();
        assert_eq!(pledges[0].payment_status, PledgeStatus::Partial);
        assert_eq!(pledges[0].paid_amount, Decimal::new(200_00, 2));

        db.record_pledge_payment(&pledge.id, Decimal::new(300_00, 2))
            .unwrap();
        let pledges = db.list_pledges(&wedding.id).unwrap();
        assert_eq!(pledges[0].payment_status, PledgeStatus::Paid);
        assert_eq!(pledges[0].balance(), Decimal::ZERO);
    }

    #[test]
    fn test_delete_wedding_removes_children() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();
        db.insert_guest(&test_guest(&wedding.id)).unwrap();

        db.delete_wedding(&wedding.id).unwrap();
        assert!(db.get_wedding(&wedding.id).unwrap().is_none());
        assert!(db.list_guests(&wedding.id).unwrap().is_empty());
    }

    #[test]
    fn test_wedding_summaries_include_counts() {
        let db = test_db();
        let wedding = test_wedding();
        db.upsert_wedding(&wedding).unwrap();
        db.insert_guest(&test_guest(&wedding.id)).unwrap();

        let summaries = db.list_wedding_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].display_name, "Amina & Jabari");
        assert_eq!(summaries[0].guest_count, 1);
        assert_eq!(summaries[0].task_count, 0);
    }
}
