//! Rate table extraction, tenor parsing, and rate record building.
//!
//! This crate provides:
//! - [`sources`] — Per-bank table extractors behind the [`BankSource`] trait
//! - [`tenor`] — Free-text tenor descriptions to `(min_days, max_days)`
//! - [`builder`] — Raw `(tenor, rate)` rows to validated [`RateRow`]s

pub mod builder;
pub mod sources;
pub mod tenor;

pub use builder::{BuiltRows, RowPolicy, build_rows};
pub use sources::{BankSource, KotakSource, SbiSource, builtin_sources, find_source};
pub use tenor::{TenorRules, parse_tenor};

#[cfg(test)]
mod tests {
    use super::*;
    use fdrates_shared::RateRow;
    use scraper::Html;

    /// Extract + build against a rendered page, end to end per source.
    fn extract_and_build(source: &dyn BankSource, html: &str) -> BuiltRows {
        let doc = Html::parse_document(html);
        let raw = source.extract_rows(&doc);
        build_rows(&raw, &source.tenor_rules(), source.row_policy())
    }

    #[test]
    fn hyphen_table_round_trip() {
        let html = r#"<html><body><div class="ratedetails"><table>
            <tr><th>Maturity Periods</th><th>Rate</th><th>Yield</th></tr>
            <tr><td>7 - 14 Days</td><td>2.75%</td><td>6.50%</td></tr>
            <tr><td>Premature closure</td><td>-</td><td>N/A</td></tr>
        </table></div></body></html>"#;

        let built = extract_and_build(&KotakSource, html);
        assert_eq!(built.skipped, 1);
        assert_eq!(
            built.rows,
            vec![RateRow {
                tenor_text: "7 - 14 Days".into(),
                min_days: Some(7),
                max_days: Some(14),
                interest_rate: 6.5,
            }]
        );
    }

    #[test]
    fn to_table_drops_unbounded_rows() {
        let html = r#"<html><body><table>
            <tr><th>Tenors</th><th>Old</th><th>New</th></tr>
            <tr><td>211 days to 1 year</td><td>5.00%</td><td>5.75%</td></tr>
            <tr><td>Bulk deposits</td><td>-</td><td>6.00%</td></tr>
        </table></body></html>"#;

        let built = extract_and_build(&SbiSource, html);
        // "Bulk deposits" parses as a rate but has no minimum bound.
        assert_eq!(built.skipped, 1);
        assert_eq!(built.rows.len(), 1);
        assert_eq!(built.rows[0].min_days, Some(211));
        assert_eq!(built.rows[0].max_days, Some(365));
        assert_eq!(built.rows[0].interest_rate, 5.75);
    }
}
