// Integration test for the TOML configuration file

use tempfile::tempdir;
use tumbleweed::config::Config;

#[test]
fn default_file_written_by_init_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();

    tokio_test::block_on(Config::create_default(path)).unwrap();
    let config = tokio_test::block_on(Config::load(path)).unwrap();

    assert_eq!(config.game.name, "Tumbleweed");
    assert_eq!(config.game.start_room, "main_street");
    assert_eq!(config.echo.defaults().echo_rate, 42);
    assert!(config.map.enabled);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = Config::parse(
        r#"
[echo]
default_rate_secs = 10

[map]
enabled = false
"#,
    )
    .unwrap();
    assert_eq!(config.echo.default_rate_secs, 10);
    assert!((config.echo.default_chance - 0.3).abs() < f64::EPSILON);
    assert!(!config.map.enabled);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn missing_file_reports_path() {
    let err = tokio_test::block_on(Config::load("/definitely/not/here.toml")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}

#[test]
fn absent_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let config = tokio_test::block_on(Config::load_or_default(path.to_str().unwrap())).unwrap();
    assert_eq!(config.storage.db_path(), std::path::PathBuf::from("data").join("world"));
}

#[test]
fn invalid_file_is_an_error_not_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[storage]\ndata_dir = \"custom\"\n\n[echo]\ndefault_chance = 1.5\n",
    )
    .unwrap();

    let err = tokio_test::block_on(Config::load_or_default(path.to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("default_chance"));
}

#[test]
fn malformed_toml_is_an_error_not_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[storage\ndata_dir = ").unwrap();
    assert!(tokio_test::block_on(Config::load_or_default(path.to_str().unwrap())).is_err());
}

#[test]
fn valid_file_is_honoured() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[storage]\ndata_dir = \"custom\"\n").unwrap();
    let config = tokio_test::block_on(Config::load_or_default(path.to_str().unwrap())).unwrap();
    assert_eq!(config.storage.db_path(), std::path::PathBuf::from("custom").join("world"));
}

#[test]
fn zero_echo_rate_is_rejected() {
    assert!(Config::parse("[echo]\ndefault_rate_secs = 0\n").is_err());
}
