//! Step-text normalization and literal extraction.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).expect("valid quoted regex"));
static LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("valid literal regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digits regex"));
static UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").expect("valid collapse regex"));

const PARAM: &str = "_param_";

/// Repository key derived from step text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Wraps an already-normalized key, e.g. a file stem read from disk.
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the plan for this key is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps step text to its repository key.
///
/// Quoted literals and digit runs become `_param_`, the rest is lowercased
/// and folded onto `[a-z0-9_]` with single underscores and none at either
/// end. Steps that differ only in literals or numbers share a key.
pub fn normalize_step(step: &str) -> NormalizedKey {
    let without_literals = QUOTED.replace_all(step, PARAM);
    let without_digits = DIGITS.replace_all(&without_literals, PARAM);
    let folded: String = without_digits
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let collapsed = UNDERSCORES.replace_all(&folded, "_");
    NormalizedKey(collapsed.trim_matches('_').to_string())
}

/// Quoted literals in left-to-right order, without the quotes.
pub fn extract_literals(step: &str) -> Vec<String> {
    LITERAL
        .captures_iter(step)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_share_a_key() {
        let dallas = normalize_step(r#"user enters "Dallas""#);
        let houston = normalize_step(r#"user enters "Houston""#);
        assert_eq!(dallas, houston);
        assert_eq!(dallas.as_str(), "user_enters_param");
    }

    #[test]
    fn digits_and_punctuation_fold() {
        assert_eq!(
            normalize_step("I wait 15 seconds!").as_str(),
            "i_wait_param_seconds"
        );
        assert_eq!(
            normalize_step(r#"  enters location "Dallas" from suggestion "#).as_str(),
            "enters_location_param_from_suggestion"
        );
        assert_eq!(
            normalize_step("User clicks the 'Log In' button").as_str(),
            "user_clicks_the_log_in_button"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for step in [
            r#"user selects country "United States""#,
            "Click   Save & Continue (step 2 of 3)",
            "",
            "___",
            "Ünïcode ✓ text",
        ] {
            let once = normalize_step(step);
            let twice = normalize_step(once.as_str());
            assert_eq!(once, twice, "step: {step}");
        }
    }

    #[test]
    fn literals_are_extracted_in_order() {
        assert_eq!(
            extract_literals(r#"user logs in as "alice" with "s3cret" and """#),
            vec!["alice".to_string(), "s3cret".to_string(), String::new()]
        );
        assert!(extract_literals("no literals here").is_empty());
    }

    #[test]
    fn file_name_uses_key() {
        assert_eq!(
            normalize_step(r#"user enters "x""#).file_name(),
            "user_enters_param.json"
        );
    }
}
