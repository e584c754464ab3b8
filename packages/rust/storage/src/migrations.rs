//! SQL migration definitions for the fdrates database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed as a batch.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: banks, interest_rates",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version   INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Bank identity records; name is the natural key, unique by convention
-- (lookup-before-insert), not by constraint.
CREATE TABLE IF NOT EXISTS banks (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- One row per parsed fixed-deposit rate entry. A bank's set is replaced
-- wholesale on each scrape.
CREATE TABLE IF NOT EXISTS interest_rates (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    bank_id       INTEGER NOT NULL REFERENCES banks(id) ON DELETE CASCADE,
    min_days      INTEGER,
    max_days      INTEGER,
    interest_rate REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_interest_rates_bank_id ON interest_rates(bank_id);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
