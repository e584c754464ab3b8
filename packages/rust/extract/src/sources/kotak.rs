//! Kotak Mahindra Bank fixed-deposit rate source.
//!
//! The rate table is rendered client-side inside a `div.ratedetails`
//! section, so the page is polled until that section appears.

use fdrates_shared::{AcquireMode, RawRow};
use scraper::{Html, Selector};
use tracing::warn;

use super::{BankSource, table_to_rows};
use crate::builder::RowPolicy;
use crate::tenor::TenorRules;

/// Fixed-deposit rates for Kotak Mahindra Bank.
pub struct KotakSource;

impl BankSource for KotakSource {
    fn name(&self) -> &'static str {
        "kotak"
    }

    fn bank_name(&self) -> &'static str {
        "Kotak Mahindra Bank"
    }

    fn default_url(&self) -> &'static str {
        "https://www.kotak.bank.in/en/rates/interest-rates.html"
    }

    fn acquire_mode(&self) -> AcquireMode {
        AcquireMode::WaitFor {
            selector: "div.ratedetails".into(),
        }
    }

    fn row_policy(&self) -> RowPolicy {
        // The table mixes day ranges with prose-only rows; keep them all.
        RowPolicy::KeepAll
    }

    fn tenor_rules(&self) -> TenorRules {
        TenorRules {
            fillers: &["and above", "upto and inclusive of", "less than", "than"],
            split_on_hyphen: true,
            recognize_months: true,
        }
    }

    fn extract_rows(&self, doc: &Html) -> Vec<RawRow> {
        let section_sel = Selector::parse("div.ratedetails").unwrap();
        let table_sel = Selector::parse("table").unwrap();

        let Some(section) = doc.select(&section_sel).next() else {
            warn!(source = self.name(), "rate section div.ratedetails not found");
            return Vec::new();
        };

        let Some(table) = section.select(&table_sel).next() else {
            warn!(source = self.name(), "no table inside rate section");
            return Vec::new();
        };

        table_to_rows(table)
    }
}
