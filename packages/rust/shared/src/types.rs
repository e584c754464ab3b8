//! Core domain types for fixed-deposit rate scraping.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// A bank identity record as stored in the database.
///
/// `name` is the natural key; `id` is assigned by the storage layer
/// (SQLite autoincrement) on first insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Database-assigned identifier.
    pub id: i64,
    /// Human-readable bank name, e.g. "Kotak Mahindra Bank".
    pub name: String,
}

// ---------------------------------------------------------------------------
// RawRow
// ---------------------------------------------------------------------------

/// A raw table row as yielded by a source's table extractor,
/// in table order with the header row excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Free-text tenor description, e.g. "7 - 14 Days".
    pub tenor_text: String,
    /// Rate cell text, e.g. "6.50%".
    pub rate_text: String,
}

impl RawRow {
    pub fn new(tenor_text: impl Into<String>, rate_text: impl Into<String>) -> Self {
        Self {
            tenor_text: tenor_text.into(),
            rate_text: rate_text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RateRow
// ---------------------------------------------------------------------------

/// One parsed, ingestible fixed-deposit rate entry.
///
/// Produced fresh each scrape and never mutated after creation. When both
/// bounds are present, `min_days <= max_days`; a single-point tenor has
/// `min_days == max_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    /// The original tenor text the bounds were parsed from.
    pub tenor_text: String,
    /// Lower bound of the tenor in days, if parseable.
    pub min_days: Option<u32>,
    /// Upper bound of the tenor in days, if parseable.
    pub max_days: Option<u32>,
    /// Annual interest rate in percent, e.g. 6.5.
    pub interest_rate: f64,
}

// ---------------------------------------------------------------------------
// AcquireMode
// ---------------------------------------------------------------------------

/// How a source's page must be acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireMode {
    /// Single GET; the page is server-rendered.
    Immediate,
    /// Poll until `selector` matches the document or the readiness timeout
    /// elapses. Used for pages that populate their rate table client-side.
    WaitFor {
        /// CSS selector that marks the page as ready.
        selector: String,
    },
}

// ---------------------------------------------------------------------------
// IngestSummary
// ---------------------------------------------------------------------------

/// Result of replacing a bank's rate set in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Identifier of the (possibly freshly inserted) bank record.
    pub bank_id: i64,
    /// Number of rate rows inserted for the bank.
    pub rows_inserted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_row_serialization() {
        let row = RateRow {
            tenor_text: "7 - 14 Days".into(),
            min_days: Some(7),
            max_days: Some(14),
            interest_rate: 6.5,
        };

        let json = serde_json::to_string(&row).expect("serialize");
        let parsed: RateRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, row);
    }

    #[test]
    fn rate_row_null_bounds_serialize_as_null() {
        let row = RateRow {
            tenor_text: "premature withdrawal".into(),
            min_days: None,
            max_days: None,
            interest_rate: 4.0,
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert!(json.contains("\"min_days\":null"));
    }
}
