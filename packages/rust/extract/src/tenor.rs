//! Tenor text normalization: free-text deposit terms to day ranges.
//!
//! Bank rate tables describe tenors in prose ("7 - 14 Days",
//! "391 Days - Less than 23 Months", "2 years to less than 3 years").
//! [`parse_tenor`] converts such a description into a `(min_days, max_days)`
//! pair of nullable day counts. It never fails; anything unrecognizable
//! yields `None` for that bound.
//!
//! The exact normalization differs per source table shape, captured by
//! [`TenorRules`]. The two rule sets in use are deliberately not unified:
//! each matches the phrasing conventions of its source.

use std::sync::LazyLock;

use regex::Regex;

/// Days per month/year for tenor conversion. Fixed multipliers; no
/// calendar-aware arithmetic.
const DAYS_PER_MONTH: u32 = 30;
const DAYS_PER_YEAR: u32 = 365;

static DAYS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*day").unwrap());
static MONTHS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*month").unwrap());
static YEARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*year").unwrap());
static BARE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)$").unwrap());
static TO_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bto\b").unwrap());

/// Source-specific normalization rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenorRules {
    /// Filler phrases removed before splitting, in order. Removal is plain
    /// substring replacement, so ordering matters ("less than" before
    /// "than") and a number phrase that legitimately contains a filler is
    /// mis-normalized. That is accepted behavior, matching the source data.
    pub fillers: &'static [&'static str],
    /// Whether a hyphen may separate the two bounds ("7 - 14 Days").
    pub split_on_hyphen: bool,
    /// Whether month tenors are recognized ("23 Months").
    pub recognize_months: bool,
}

/// Time unit recognized in a tenor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Days,
    Months,
    Years,
}

impl Unit {
    fn to_days(self, value: u32) -> u32 {
        match self {
            Unit::Days => value,
            Unit::Months => value.saturating_mul(DAYS_PER_MONTH),
            Unit::Years => value.saturating_mul(DAYS_PER_YEAR),
        }
    }
}

/// A numeric magnitude extracted from one tenor component. A bare number
/// ("7" in "7 - 14 Days") carries no unit of its own.
#[derive(Debug, Clone, Copy)]
struct Magnitude {
    value: u32,
    unit: Option<Unit>,
}

/// Parse a free-text tenor description into `(min_days, max_days)`.
///
/// Algorithm: lowercase, strip the rule set's filler phrases, split into a
/// left and right component (on the word "to", else on the first hyphen if
/// the rules allow, else the whole string is both), then extract one
/// magnitude per component with days > months > years pattern priority.
/// An unparseable component yields `None`; a `None` right bound is coalesced
/// to the left value (single-point tenor).
pub fn parse_tenor(text: &str, rules: &TenorRules) -> (Option<u32>, Option<u32>) {
    let mut normalized = text.to_lowercase();
    for filler in rules.fillers {
        normalized = normalized.replace(filler, "");
    }
    let normalized = normalized.trim();

    let (left, right) = split_components(normalized, rules);

    let left_mag = component_magnitude(left, rules);
    let right_mag = component_magnitude(right, rules);

    // A unitless bound borrows the other bound's unit ("7 - 14 days" means
    // 7 days), defaulting to days when neither side names one.
    let left_unit = left_mag.and_then(|m| m.unit);
    let right_unit = right_mag.and_then(|m| m.unit);

    let min_days = left_mag.map(|m| resolve_days(m, right_unit));
    let max_days = right_mag.map(|m| resolve_days(m, left_unit)).or(min_days);

    (min_days, max_days)
}

/// Split normalized tenor text into its left and right components.
fn split_components<'a>(text: &'a str, rules: &TenorRules) -> (&'a str, &'a str) {
    if let Some(m) = TO_WORD_RE.find(text) {
        return (text[..m.start()].trim(), text[m.end()..].trim());
    }

    if rules.split_on_hyphen {
        if let Some((left, right)) = text.split_once('-') {
            return (left.trim(), right.trim());
        }
    }

    (text, text)
}

/// Extract the magnitude of one component, trying the unit patterns in
/// priority order. The first match wins; at most one unit per component.
fn component_magnitude(text: &str, rules: &TenorRules) -> Option<Magnitude> {
    if let Some(value) = captured_value(&DAYS_RE, text) {
        return Some(Magnitude {
            value,
            unit: Some(Unit::Days),
        });
    }

    if rules.recognize_months {
        if let Some(value) = captured_value(&MONTHS_RE, text) {
            return Some(Magnitude {
                value,
                unit: Some(Unit::Months),
            });
        }
    }

    if let Some(value) = captured_value(&YEARS_RE, text) {
        return Some(Magnitude {
            value,
            unit: Some(Unit::Years),
        });
    }

    if let Some(value) = captured_value(&BARE_NUMBER_RE, text) {
        return Some(Magnitude { value, unit: None });
    }

    None
}

fn captured_value(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn resolve_days(mag: Magnitude, other_unit: Option<Unit>) -> u32 {
    mag.unit
        .or(other_unit)
        .unwrap_or(Unit::Days)
        .to_days(mag.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rules matching the hyphen-separated table shape.
    fn range_rules() -> TenorRules {
        TenorRules {
            fillers: &["and above", "upto and inclusive of", "less than", "than"],
            split_on_hyphen: true,
            recognize_months: true,
        }
    }

    /// Rules matching the "X to Y" table shape.
    fn to_rules() -> TenorRules {
        TenorRules {
            fillers: &["less than", "less", "than"],
            split_on_hyphen: false,
            recognize_months: false,
        }
    }

    #[test]
    fn single_day_tenor_is_a_point() {
        assert_eq!(parse_tenor("7 days", &range_rules()), (Some(7), Some(7)));
        assert_eq!(parse_tenor("7 Days", &to_rules()), (Some(7), Some(7)));
        assert_eq!(parse_tenor("365 Days", &range_rules()), (Some(365), Some(365)));
    }

    #[test]
    fn hyphen_range_in_days() {
        assert_eq!(parse_tenor("7 - 14 Days", &range_rules()), (Some(7), Some(14)));
        assert_eq!(parse_tenor("15 - 30 Days", &range_rules()), (Some(15), Some(30)));
        assert_eq!(parse_tenor("31 - 45 days", &range_rules()), (Some(31), Some(45)));
    }

    #[test]
    fn days_to_year_range() {
        assert_eq!(
            parse_tenor("211 days to 1 year", &to_rules()),
            (Some(211), Some(365))
        );
        assert_eq!(
            parse_tenor("211 days to 1 year", &range_rules()),
            (Some(211), Some(365))
        );
    }

    #[test]
    fn year_to_year_range_with_fillers() {
        assert_eq!(
            parse_tenor("2 years to less than 3 years", &to_rules()),
            (Some(730), Some(1095))
        );
    }

    #[test]
    fn filler_stripped_year_phrase_collapses_to_a_point() {
        // After stripping "and above" and "less than" there is neither the
        // word "to" nor a hyphen left, so the whole string is one component
        // and the first year match wins for both bounds.
        assert_eq!(
            parse_tenor("3 years and above but less than 4 years", &range_rules()),
            (Some(1095), Some(1095))
        );
    }

    #[test]
    fn hyphen_range_with_months() {
        assert_eq!(
            parse_tenor("391 Days - Less than 23 Months", &range_rules()),
            (Some(391), Some(690))
        );
    }

    #[test]
    fn months_not_recognized_without_the_rule() {
        // "23 months" carries no recognized unit under the to-style rules.
        assert_eq!(parse_tenor("23 months", &to_rules()), (None, None));
        assert_eq!(parse_tenor("23 months", &range_rules()), (Some(690), Some(690)));
    }

    #[test]
    fn bare_number_inherits_unit_from_other_bound() {
        assert_eq!(parse_tenor("7 - 14 days", &range_rules()), (Some(7), Some(14)));
        assert_eq!(parse_tenor("1 - 2 years", &range_rules()), (Some(365), Some(730)));
    }

    #[test]
    fn unparseable_text_yields_nulls() {
        assert_eq!(parse_tenor("premature withdrawal", &range_rules()), (None, None));
        assert_eq!(parse_tenor("", &to_rules()), (None, None));
    }

    #[test]
    fn unparseable_right_bound_coalesces_to_left() {
        assert_eq!(
            parse_tenor("5 years to maturity", &to_rules()),
            (Some(1825), Some(1825))
        );
    }

    #[test]
    fn unparseable_left_bound_stays_null() {
        assert_eq!(
            parse_tenor("maturity to 5 years", &to_rules()),
            (None, Some(1825))
        );
    }

    #[test]
    fn to_matches_the_word_not_a_substring() {
        // "october" must not be treated as a range separator.
        assert_eq!(
            parse_tenor("90 days october special", &to_rules()),
            (Some(90), Some(90))
        );
    }

    #[test]
    fn hyphen_ignored_under_to_style_rules() {
        // The to-style tables never use hyphen ranges; the first day match
        // in the whole string wins.
        assert_eq!(parse_tenor("7 - 14 days", &to_rules()), (Some(14), Some(14)));
    }
}
