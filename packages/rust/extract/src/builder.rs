//! Rate record assembly: raw table rows into validated [`RateRow`]s.

use fdrates_shared::{RateRow, RawRow};
use tracing::debug;

use crate::tenor::{TenorRules, parse_tenor};

/// Per-source row inclusion policy. The two source tables have different
/// shapes, and their policies are intentionally kept distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPolicy {
    /// Include rows even when neither day bound parsed.
    KeepAll,
    /// Skip rows whose minimum day bound is null.
    RequireMinBound,
}

/// Result of building rate rows from raw table rows.
#[derive(Debug, Clone)]
pub struct BuiltRows {
    /// Rows that passed numeric parsing and the inclusion policy.
    pub rows: Vec<RateRow>,
    /// Rows dropped (unparseable rate text or policy rejection).
    /// Aggregate count only; row-level failures are not surfaced as errors.
    pub skipped: usize,
}

/// Build zero or one [`RateRow`] per raw `(tenor_text, rate_text)` pair.
///
/// The rate text has a trailing `%` and surrounding whitespace stripped and
/// must parse as a float; otherwise the row is silently skipped. The tenor
/// text goes through [`parse_tenor`] with the source's rules.
pub fn build_rows(raw: &[RawRow], rules: &TenorRules, policy: RowPolicy) -> BuiltRows {
    let mut rows = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for r in raw {
        let rate_text = r.rate_text.trim().trim_end_matches('%').trim();
        let Ok(interest_rate) = rate_text.parse::<f64>() else {
            skipped += 1;
            continue;
        };

        let (min_days, max_days) = parse_tenor(&r.tenor_text, rules);

        if policy == RowPolicy::RequireMinBound && min_days.is_none() {
            skipped += 1;
            continue;
        }

        rows.push(RateRow {
            tenor_text: r.tenor_text.clone(),
            min_days,
            max_days,
            interest_rate,
        });
    }

    debug!(built = rows.len(), skipped, "built rate rows");
    BuiltRows { rows, skipped }
}
