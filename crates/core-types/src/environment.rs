//! Per-run environment variables (`${KEY}` substitution).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::{info, warn};

use crate::CoreError;

/// Environment variable selecting the environment file.
pub const ENV_SELECTOR: &str = "TEST_ENV";
pub const DEFAULT_ENVIRONMENT: &str = "DEV";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"));

/// Flat key/value configuration for one target environment.
///
/// Built once per run and shared read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    name: String,
    values: BTreeMap<String, String>,
}

impl EnvironmentConfig {
    pub fn new(name: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into().to_uppercase(),
            values,
        }
    }

    /// Empty configuration named after the default environment.
    pub fn empty() -> Self {
        Self::new(DEFAULT_ENVIRONMENT, BTreeMap::new())
    }

    /// Environment name taken from `TEST_ENV`, defaulting to `DEV`.
    pub fn selected_name() -> String {
        std::env::var(ENV_SELECTOR)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
            .to_uppercase()
    }

    /// Path of the file for `name` inside `dir`.
    pub fn file_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.json", name.to_uppercase()))
    }

    /// Reads `<dir>/<NAME>.json`.
    pub fn from_file(dir: &Path, name: &str) -> Result<Self, CoreError> {
        let path = Self::file_path(dir, name);
        let raw = std::fs::read_to_string(&path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: BTreeMap<String, Value> =
            serde_json::from_str(&raw).map_err(|source| CoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let values = parsed
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        Ok(Self::new(name, values))
    }

    /// Loads the environment file, falling back to an empty configuration
    /// when the file is missing or unreadable.
    pub fn load(dir: &Path, name: &str) -> Self {
        match Self::from_file(dir, name) {
            Ok(config) => {
                info!(
                    environment = %config.name,
                    keys = config.values.len(),
                    "Loaded environment configuration"
                );
                config
            }
            Err(CoreError::Io { path, source }) => {
                warn!(%path, error = %source, "Environment file not found, using empty config");
                Self::new(name, BTreeMap::new())
            }
            Err(err) => {
                warn!(error = %err, "Environment file unusable, using empty config");
                Self::new(name, BTreeMap::new())
            }
        }
    }

    /// Loads the environment selected by `TEST_ENV`.
    pub fn load_selected(dir: &Path) -> Self {
        Self::load(dir, &Self::selected_name())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Value for `key`, or `default` when unset or empty.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or(default).to_string()
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Replaces `${KEY}` tokens with their values. Unknown keys are left
    /// untouched.
    pub fn resolve(&self, text: &str) -> String {
        if !text.contains("${") {
            return text.to_string();
        }
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnvironmentConfig {
        let mut values = BTreeMap::new();
        values.insert("BASE_URL".to_string(), "https://qa.example.com".to_string());
        values.insert("USER".to_string(), "alice".to_string());
        values.insert("EMPTY".to_string(), String::new());
        EnvironmentConfig::new("qa", values)
    }

    #[test]
    fn resolves_known_placeholders() {
        let env = sample();
        assert_eq!(env.name(), "QA");
        assert_eq!(
            env.resolve("${BASE_URL}/login?u=${USER}"),
            "https://qa.example.com/login?u=alice"
        );
        assert_eq!(env.resolve("${MISSING}/x"), "${MISSING}/x");
        assert_eq!(env.resolve("plain"), "plain");
    }

    #[test]
    fn get_falls_back_on_empty_values() {
        let env = sample();
        assert_eq!(env.get("USER", "bob"), "alice");
        assert_eq!(env.get("EMPTY", "fallback"), "fallback");
        assert_eq!(env.get("NOPE", ""), "");
    }

    #[test]
    fn loads_file_and_stringifies_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("STAGE.json"),
            r#"{ "BASE_URL": "https://stage.example.com", "RETRIES": 3, "FLAG": true }"#,
        )
        .unwrap();

        let env = EnvironmentConfig::load(dir.path(), "stage");
        assert_eq!(env.name(), "STAGE");
        assert_eq!(env.value("BASE_URL"), Some("https://stage.example.com"));
        assert_eq!(env.value("RETRIES"), Some("3"));
        assert_eq!(env.value("FLAG"), Some("true"));
    }

    #[test]
    fn missing_or_broken_file_yields_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EnvironmentConfig::load(dir.path(), "PROD").all().is_empty());

        std::fs::write(dir.path().join("PROD.json"), "{ not json").unwrap();
        assert!(matches!(
            EnvironmentConfig::from_file(dir.path(), "PROD"),
            Err(CoreError::Parse { .. })
        ));
        assert!(EnvironmentConfig::load(dir.path(), "PROD").all().is_empty());
    }
}
