//! Integration tests for config loading against the real config.toml.

use std::io::Write;
use std::path::PathBuf;

use favtoggle_core::{Config, Error};

fn project_root() -> PathBuf {
    // crates/favtoggle-core/ -> workspace root
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", contents).unwrap();
    path
}

#[test]
fn test_load_real_config() {
    let config = Config::load(&project_root().join("config.toml"))
        .expect("Failed to load config.toml");

    config.validate().expect("Real config.toml should be valid");
    assert!(!config.catalog.products.is_empty());
    assert!(
        config.catalog.products.iter().any(|p| !p.heart),
        "Expected at least one product rendered without a nested heart"
    );
}

#[test]
fn test_find_and_load_with_explicit_path() {
    let config_path = project_root().join("config.toml");

    let result = Config::find_and_load(Some(&config_path)).unwrap();

    assert!(!result.used_defaults);
    assert_eq!(result.source, Some(config_path));
    result.config.validate().unwrap();
}

#[test]
fn test_find_and_load_explicit_missing_fails() {
    let missing = PathBuf::from("/nonexistent/favtoggle/config.toml");

    let err = Config::find_and_load(Some(&missing)).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(path) if path == missing));
}

#[test]
fn test_find_and_load_without_any_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let search_paths = vec![
        dir.path().join("xdg").join("favtoggle").join("config.toml"),
        dir.path().join("config.toml"),
    ];

    let result = Config::find_and_load_from(None, &search_paths).unwrap();

    assert!(result.used_defaults);
    assert_eq!(result.source, None);
    result.config.validate().expect("Config should be valid");
}

#[test]
fn test_find_and_load_takes_first_existing_search_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[window]\ncolumns = 3\n");
    let search_paths = vec![dir.path().join("missing.toml"), path.clone()];

    let result = Config::find_and_load_from(None, &search_paths).unwrap();

    assert!(!result.used_defaults);
    assert_eq!(result.source, Some(path));
    assert_eq!(result.config.window.columns, 3);
}

#[test]
fn test_find_and_load_broken_search_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "bogus = 1\n");

    let err = Config::find_and_load_from(None, &[path]).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_user_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r##"
[colors]
favorited = "#e01b24"

[window]
columns = 4
"##,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.colors.favorited, "#e01b24");
    assert_eq!(config.colors.neutral, "#ccc");
    assert_eq!(config.window.columns, 4);
    assert_eq!(config.window.title, "Catalog");
    config.validate().unwrap();
}

#[test]
fn test_broken_config_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "this is not valid toml {{");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_parsed_but_invalid_config_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[selectors]
icon = "favorite icon"

[colors]
neutral = "grey"
"#,
    );

    let config = Config::load(&path).unwrap();
    let err = config.validate().unwrap_err().to_string();

    assert!(err.contains("selectors.icon"));
    assert!(err.contains("colors.neutral"));
}
