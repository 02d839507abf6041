use std::path::PathBuf;

use serial_test::serial;
use stepwright_cli::config::{HEADLESS_ENV, REPOSITORY_ENV};
use stepwright_cli::AppConfig;
use stepwright_core_types::ENV_SELECTOR;

fn clear_overrides() {
    for key in [REPOSITORY_ENV, ENV_SELECTOR, HEADLESS_ENV] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn process_environment_overrides_file_values() {
    clear_overrides();
    std::env::set_var(REPOSITORY_ENV, "plans");
    std::env::set_var(ENV_SELECTOR, "staging");
    std::env::set_var(HEADLESS_ENV, "false");

    let mut config: AppConfig = serde_yaml::from_str("repository_dir: from-file\n").unwrap();
    config.apply_env_overrides();
    clear_overrides();

    assert_eq!(config.repository_dir, PathBuf::from("plans"));
    assert_eq!(config.environment_name(), "STAGING");
    assert!(!config.browser.headless);
}

#[test]
#[serial]
fn environment_file_feeds_executor_substitution() {
    clear_overrides();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("QA.json"),
        r#"{ "BASE_URL": "https://qa.example.test" }"#,
    )
    .unwrap();

    let config = AppConfig {
        environments_dir: dir.path().to_path_buf(),
        environment: Some("qa".into()),
        ..AppConfig::default()
    };
    let environment = config.load_environment();

    assert_eq!(environment.name(), "QA");
    assert_eq!(
        environment.resolve("${BASE_URL}/login"),
        "https://qa.example.test/login"
    );
}

#[test]
#[serial]
fn unset_environment_defaults_to_dev() {
    clear_overrides();
    assert_eq!(AppConfig::default().environment_name(), "DEV");
}
