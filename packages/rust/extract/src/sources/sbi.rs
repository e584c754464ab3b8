//! SBI fixed-deposit rate source.
//!
//! The retail term-deposit page is server-rendered and carries several
//! tables; the rate table is the one whose first header cell says "Tenors".

use fdrates_shared::{AcquireMode, RawRow};
use scraper::{Html, Selector};
use tracing::warn;

use super::{BankSource, cell_text, table_to_rows};
use crate::builder::RowPolicy;
use crate::tenor::TenorRules;

/// Fixed-deposit rates for SBI retail domestic term deposits.
pub struct SbiSource;

impl BankSource for SbiSource {
    fn name(&self) -> &'static str {
        "sbi"
    }

    fn bank_name(&self) -> &'static str {
        "SBI"
    }

    fn default_url(&self) -> &'static str {
        "https://sbi.bank.in/web/interest-rates/deposit-rates/retail-domestic-term-deposits"
    }

    fn acquire_mode(&self) -> AcquireMode {
        AcquireMode::Immediate
    }

    fn row_policy(&self) -> RowPolicy {
        // Rows without a parseable minimum bound are table footnotes; drop them.
        RowPolicy::RequireMinBound
    }

    fn tenor_rules(&self) -> TenorRules {
        TenorRules {
            fillers: &["less than", "less", "than"],
            split_on_hyphen: false,
            recognize_months: false,
        }
    }

    fn extract_rows(&self, doc: &Html) -> Vec<RawRow> {
        let table_sel = Selector::parse("table").unwrap();
        let th_sel = Selector::parse("th").unwrap();

        let mut rows = Vec::new();
        for table in doc.select(&table_sel) {
            let Some(first_header) = table.select(&th_sel).next() else {
                continue;
            };

            if !cell_text(first_header).to_lowercase().contains("tenors") {
                continue;
            }

            rows.extend(table_to_rows(table));
        }

        if rows.is_empty() {
            warn!(source = self.name(), "no table with a Tenors header found");
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <table>
            <tr><th>Scheme</th><th>Details</th></tr>
            <tr><td>Annuity</td><td>see below</td></tr>
        </table>
        <table>
            <tr><th>Tenors</th><th>Existing Rates</th><th>Revised Rates</th></tr>
            <tr><td>7 days to 45 days</td><td>3.00%</td><td>3.50%</td></tr>
            <tr><td>46 days to 179 days</td><td>4.50%</td><td>5.50%</td></tr>
            <tr><td>2 years to less than 3 years</td><td>6.75%</td><td>7.00%</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn selects_the_tenors_table() {
        let doc = Html::parse_document(PAGE);
        let rows = SbiSource.extract_rows(&doc);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].tenor_text, "7 days to 45 days");
        // Third column is the revised (current) rate.
        assert_eq!(rows[0].rate_text, "3.50%");
        assert_eq!(rows[2].tenor_text, "2 years to less than 3 years");
    }

    #[test]
    fn page_without_tenors_table_yields_empty_set() {
        let doc = Html::parse_document(
            "<html><body><table><tr><th>Scheme</th></tr></table></body></html>",
        );
        assert!(SbiSource.extract_rows(&doc).is_empty());
    }

    #[test]
    fn collects_from_every_matching_table() {
        let two_tables = format!(
            r#"{}<table>
                <tr><th>Tenors (Senior Citizens)</th><th>Old</th><th>New</th></tr>
                <tr><td>7 days to 45 days</td><td>3.50%</td><td>4.00%</td></tr>
            </table>"#,
            PAGE
        );
        let doc = Html::parse_document(&two_tables);
        let rows = SbiSource.extract_rows(&doc);
        assert_eq!(rows.len(), 4);
    }
}
