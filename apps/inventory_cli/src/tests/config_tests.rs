use super::*;

use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(None, no_env).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.default_sort, SortOption::NameAsc);
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        database_url = "sqlite://./stock.db"
        default_sort = "quantity-desc"
        log_filter = "debug"
    "#;
    let settings = load_settings_from(Some(raw), no_env).expect("settings");
    assert_eq!(settings.database_url, "sqlite://./stock.db");
    assert_eq!(settings.default_sort, SortOption::QuantityDesc);
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let raw = r#"database_url = "sqlite://./from-file.db""#;
    let env = env_from(&[
        ("DATABASE_URL", "sqlite://./plain.db"),
        ("APP__DATABASE_URL", "sqlite://./app.db"),
        ("APP__DEFAULT_SORT", "name-desc"),
    ]);
    let settings = load_settings_from(Some(raw), env).expect("settings");
    assert_eq!(settings.database_url, "sqlite://./app.db");
    assert_eq!(settings.default_sort, SortOption::NameDesc);
}

#[test]
fn rejects_unknown_sort_keys() {
    assert!(load_settings_from(Some(r#"default_sort = "price""#), no_env).is_err());
    assert!(load_settings_from(None, env_from(&[("APP__DEFAULT_SORT", "price")])).is_err());
}

#[test]
fn rejects_unknown_settings_keys() {
    assert!(load_settings_from(Some(r#"bind_addr = "0.0.0.0""#), no_env).is_err());
}

#[test]
fn missing_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(&dir.path().join("absent.toml")).expect("settings");
    assert_eq!(settings.log_filter, Settings::default().log_filter);
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite:inv.db"), "sqlite://inv.db");
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url("   "), Settings::default().database_url);
}

#[tokio::test]
async fn normalized_plain_path_opens_in_a_missing_directory() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("inventory.db");

    let database_url = normalize_database_url(db_path.to_string_lossy().as_ref());
    assert!(database_url.starts_with("sqlite://"));

    let storage = storage::Storage::new(&database_url).await.expect("open sqlite");
    storage.pool().close().await;

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}
