//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    -- ============================================
    -- LAYER 1: Canonical planning records
    -- ============================================

    CREATE TABLE weddings (
        id            TEXT PRIMARY KEY,
        partner_one   TEXT NOT NULL,
        partner_two   TEXT NOT NULL,
        wedding_date  TEXT NOT NULL,      -- ISO 8601 date
        venue         TEXT NOT NULL,
        total_budget  TEXT NOT NULL,      -- decimal string
        status        TEXT NOT NULL,      -- 'planning', 'in_progress', 'completed', 'cancelled'
        description   TEXT NOT NULL DEFAULT '',
        created_at    DATETIME NOT NULL,
        updated_at    DATETIME NOT NULL
    );

    CREATE INDEX idx_weddings_status ON weddings(status);
    CREATE INDEX idx_weddings_date ON weddings(wedding_date);

    CREATE TABLE guests (
        id             TEXT PRIMARY KEY,
        wedding_id     TEXT NOT NULL REFERENCES weddings(id),
        name           TEXT NOT NULL,
        phone          TEXT NOT NULL DEFAULT '',
        email          TEXT NOT NULL DEFAULT '',
        relationship   TEXT NOT NULL,     -- 'family', 'friend', 'colleague', 'other'
        rsvp_status    TEXT NOT NULL,     -- 'pending', 'confirmed', 'declined'
        party_size     INTEGER NOT NULL DEFAULT 1 CHECK (party_size >= 1),
        dietary_notes  TEXT NOT NULL DEFAULT '',
        created_at     DATETIME NOT NULL
    );

    CREATE INDEX idx_guests_wedding ON guests(wedding_id);
    CREATE INDEX idx_guests_rsvp ON guests(wedding_id, rsvp_status);

    CREATE TABLE tasks (
        id           TEXT PRIMARY KEY,
        wedding_id   TEXT NOT NULL REFERENCES weddings(id),
        title        TEXT NOT NULL,
        description  TEXT NOT NULL DEFAULT '',
        priority     TEXT NOT NULL,       -- 'low', 'medium', 'high', 'urgent'
        status       TEXT NOT NULL,       -- 'todo', 'in_progress', 'done'
        due_date     TEXT,                -- ISO 8601 date
        assigned_to  TEXT NOT NULL DEFAULT '',
        cost         TEXT,                -- decimal string
        created_at   DATETIME NOT NULL,
        updated_at   DATETIME NOT NULL
    );

    CREATE INDEX idx_tasks_wedding ON tasks(wedding_id);
    CREATE INDEX idx_tasks_status ON tasks(wedding_id, status);

    CREATE TABLE budget_items (
        id              TEXT PRIMARY KEY,
        wedding_id      TEXT NOT NULL REFERENCES weddings(id),
        category        TEXT NOT NULL,
        item_name       TEXT NOT NULL,
        estimated_cost  TEXT NOT NULL,    -- decimal string
        actual_cost     TEXT,             -- decimal string, NULL until invoiced
        notes           TEXT NOT NULL DEFAULT '',
        created_at      DATETIME NOT NULL
    );

    CREATE INDEX idx_budget_items_wedding ON budget_items(wedding_id);
    CREATE INDEX idx_budget_items_category ON budget_items(wedding_id, category);

    CREATE TABLE vendors (
        id            TEXT PRIMARY KEY,
        wedding_id    TEXT NOT NULL REFERENCES weddings(id),
        name          TEXT NOT NULL,
        vendor_type   TEXT NOT NULL,
        status        TEXT NOT NULL,      -- 'inquiry', 'negotiating', 'booked', 'completed', 'rejected'
        quote         TEXT,               -- decimal string
        deposit       TEXT,               -- decimal string
        final_amount  TEXT,               -- decimal string
        contact_email TEXT NOT NULL DEFAULT '',
        created_at    DATETIME NOT NULL
    );

    CREATE INDEX idx_vendors_wedding ON vendors(wedding_id);
    CREATE INDEX idx_vendors_status ON vendors(wedding_id, status);

    CREATE TABLE timeline_events (
        id            TEXT PRIMARY KEY,
        wedding_id    TEXT NOT NULL REFERENCES weddings(id),
        event_type    TEXT NOT NULL,
        event_date    TEXT NOT NULL,      -- ISO 8601 date
        is_completed  INTEGER NOT NULL DEFAULT 0,
        created_at    DATETIME NOT NULL
    );

    CREATE INDEX idx_timeline_events_wedding ON timeline_events(wedding_id);
    CREATE INDEX idx_timeline_events_date ON timeline_events(wedding_id, event_date);

    CREATE TABLE pledges (
        id              TEXT PRIMARY KEY,
        wedding_id      TEXT NOT NULL REFERENCES weddings(id),
        guest_id        TEXT REFERENCES guests(id),
        pledged_amount  TEXT NOT NULL,    -- decimal string
        paid_amount     TEXT NOT NULL,    -- decimal string
        payment_status  TEXT NOT NULL,    -- 'pledged', 'partial', 'paid', 'cancelled'
        created_at      DATETIME NOT NULL
    );

    CREATE INDEX idx_pledges_wedding ON pledges(wedding_id);

    -- ============================================
    -- LAYER 2: Derived (regenerable)
    -- ============================================

    CREATE TABLE analytics_snapshots (
        wedding_id                    TEXT PRIMARY KEY REFERENCES weddings(id),
        computed_at                   DATETIME NOT NULL,

        -- Guest analytics
        total_invitations_sent        INTEGER NOT NULL,
        total_confirmed               INTEGER NOT NULL,
        total_pending                 INTEGER NOT NULL,
        total_declined                INTEGER NOT NULL,
        average_guests_per_invitation REAL NOT NULL,

        -- Budget analytics
        total_estimated_budget        TEXT NOT NULL,
        total_actual_spending         TEXT NOT NULL,
        budget_variance               TEXT NOT NULL,
        budget_category_breakdown     JSON NOT NULL,

        -- Task analytics
        total_tasks                   INTEGER NOT NULL,
        completed_tasks               INTEGER NOT NULL,
        pending_tasks                 INTEGER NOT NULL,
        overdue_tasks                 INTEGER NOT NULL,
        completion_percentage         REAL NOT NULL,

        -- Vendor analytics
        total_vendors                 INTEGER NOT NULL,
        vendors_booked                INTEGER NOT NULL,
        average_vendor_quote          TEXT NOT NULL,
        total_vendor_cost             TEXT NOT NULL,

        -- Timeline analytics
        days_until_wedding            INTEGER NOT NULL,
        weeks_until_wedding           INTEGER NOT NULL,
        completion_by_milestone       JSON NOT NULL,

        -- Health scores
        budget_health_score           REAL NOT NULL,
        task_health_score             REAL NOT NULL,
        guest_health_score            REAL NOT NULL,
        planning_health_score         REAL NOT NULL,
        overall_health_score          REAL NOT NULL
    );

    CREATE TABLE weekly_snapshots (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        wedding_id        TEXT NOT NULL REFERENCES weddings(id),
        week_number       INTEGER NOT NULL,
        confirmed_count   INTEGER NOT NULL,
        pending_count     INTEGER NOT NULL,
        spending_to_date  TEXT NOT NULL,  -- decimal string
        tasks_completed   INTEGER NOT NULL,
        tasks_pending     INTEGER NOT NULL,
        created_at        DATETIME NOT NULL
    );

    CREATE INDEX idx_weekly_snapshots_wedding ON weekly_snapshots(wedding_id, week_number);

    CREATE TABLE engagement_metrics (
        wedding_id                      TEXT PRIMARY KEY REFERENCES weddings(id),
        rsvp_response_rate              REAL NOT NULL,
        relationship_breakdown          JSON NOT NULL,
        dietary_requirements_percentage REAL NOT NULL,
        group_size_distribution         JSON NOT NULL,
        computed_at                     DATETIME NOT NULL
    );
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        // Check version
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables = [
            "weddings",
            "guests",
            "tasks",
            "budget_items",
            "vendors",
            "timeline_events",
            "pledges",
            "analytics_snapshots",
            "weekly_snapshots",
            "engagement_metrics",
        ];

        for table in tables {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        run_migrations(&conn).unwrap();

        // Verify foreign key constraints are set up correctly by checking pragma
        let fk_list: Vec<(String, String)> = conn
            .prepare("PRAGMA foreign_key_list(guests)")
            .unwrap()
            .query_map([], |row| {
                Ok((row.get::<_, String>(2)?, row.get::<_, String>(3)?))
            })
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(
            fk_list.iter().any(|(table, _)| table == "weddings"),
            "guests should reference weddings"
        );

        let fk_list: Vec<(String, String)> = conn
            .prepare("PRAGMA foreign_key_list(analytics_snapshots)")
            .unwrap()
            .query_map([], |row| {
                Ok((row.get::<_, String>(2)?, row.get::<_, String>(3)?))
            })
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(
            fk_list.iter().any(|(table, _)| table == "weddings"),
            "analytics_snapshots should reference weddings"
        );
    }
}
