//! Date expressions for date-picker fields
//!
//! Accepts either a relative offset (`"25 days"`, `"2 Months"`, `"1 year"`)
//! applied to today, or an absolute date in one of a handful of common
//! layouts. Output uses `DD`, `MM`, `MMM` and `YYYY` tokens.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Output pattern used when none is configured
pub const DEFAULT_DATE_FORMAT: &str = "DD-MM-YYYY";

static RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(day|month|year)s?").expect("valid relative date regex")
});

// Leftmost-first alternation picks the longest token at each position.
static TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new("YYYY|MMM|MM|DD").expect("valid date token regex"));

/// Absolute layouts, tried in order. `%d` and `%m` also accept one digit.
const ABSOLUTE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Resolve `expr` against today's local date and render it with `format`.
///
/// Unresolvable input is logged and returned unchanged.
pub fn resolve_date(expr: &str, format: &str) -> String {
    resolve_date_from(expr, format, Local::now().date_naive())
}

/// Same as [`resolve_date`] with an explicit "today".
pub fn resolve_date_from(expr: &str, format: &str, today: NaiveDate) -> String {
    let expr = expr.trim();
    if expr.is_empty() {
        return String::new();
    }

    match parse_relative(expr, today).or_else(|| parse_absolute(expr)) {
        Some(date) => {
            let rendered = render(date, format);
            debug!(expr = %expr, resolved = %rendered, "Resolved date");
            rendered
        }
        None => {
            warn!(expr = %expr, "Could not resolve date, using it verbatim");
            expr.to_string()
        }
    }
}

fn parse_relative(expr: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE.captures(expr)?;
    let amount: u32 = caps[1].parse().ok()?;
    match caps[2].to_ascii_lowercase().as_str() {
        "day" => today.checked_add_days(Days::new(u64::from(amount))),
        "month" => today.checked_add_months(Months::new(amount)),
        "year" => today.checked_add_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    }
}

fn parse_absolute(expr: &str) -> Option<NaiveDate> {
    ABSOLUTE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(expr, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(expr)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn render(date: NaiveDate, format: &str) -> String {
    TOKENS
        .replace_all(format, |caps: &regex::Captures<'_>| match &caps[0] {
            "YYYY" => format!("{:04}", date.year()),
            "MMM" => MONTHS[date.month0() as usize].to_string(),
            "MM" => format!("{:02}", date.month()),
            _ => format!("{:02}", date.day()),
        })
        .into_owned()
}
