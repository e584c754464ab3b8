//! Bank source trait and built-in sources.
//!
//! Each source knows where its rate page lives, how the page must be
//! acquired, where the rate table sits in the document, and which tenor
//! rules and row policy fit its table shape.

mod kotak;
mod sbi;

use fdrates_shared::{AcquireMode, RawRow};
use scraper::{ElementRef, Html, Selector};

use crate::builder::RowPolicy;
use crate::tenor::TenorRules;

pub use kotak::KotakSource;
pub use sbi::SbiSource;

/// Trait for per-bank rate table extraction.
///
/// `extract_rows` reports an absent table via a diagnostic and an empty
/// result set; the pipeline then continues with zero rows rather than
/// terminating.
pub trait BankSource: Send + Sync {
    /// Registry key, e.g. "kotak".
    fn name(&self) -> &'static str;

    /// Bank name persisted as the identity record.
    fn bank_name(&self) -> &'static str;

    /// Built-in rate page URL (overridable via config).
    fn default_url(&self) -> &'static str;

    /// How the rate page must be acquired.
    fn acquire_mode(&self) -> AcquireMode;

    /// Row inclusion policy for this source's table shape.
    fn row_policy(&self) -> RowPolicy;

    /// Tenor normalization rules for this source's phrasing.
    fn tenor_rules(&self) -> TenorRules;

    /// Locate the rate table and yield raw `(tenor, rate)` rows,
    /// header excluded, in table order.
    fn extract_rows(&self, doc: &Html) -> Vec<RawRow>;
}

/// All built-in sources, in registry order.
pub fn builtin_sources() -> Vec<Box<dyn BankSource>> {
    vec![Box::new(KotakSource), Box::new(SbiSource)]
}

/// Look up a built-in source by registry key.
pub fn find_source(name: &str) -> Option<Box<dyn BankSource>> {
    builtin_sources().into_iter().find(|s| s.name() == name)
}

/// Read the raw rows out of a located table: skip the header row, take the
/// tenor from the first cell and the rate from the third. Rows missing
/// either cell are skipped.
pub(crate) fn table_to_rows(table: ElementRef<'_>) -> Vec<RawRow> {
    let tr_sel = Selector::parse("tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    let mut rows = Vec::new();
    for tr in table.select(&tr_sel).skip(1) {
        let cells: Vec<ElementRef<'_>> = tr.select(&td_sel).collect();
        let (Some(tenor_cell), Some(rate_cell)) = (cells.first(), cells.get(2)) else {
            continue;
        };

        rows.push(RawRow::new(cell_text(*tenor_cell), cell_text(*rate_cell)));
    }
    rows
}

/// Collapse a cell's text nodes into one trimmed string.
pub(crate) fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
