use car_catalog_web::config::{AppConfig, DEFAULT_API_BASE_URL};
use car_catalog_web::lists::DEFAULT_MAX_COMPARISONS;
use car_catalog_web::session::DEFAULT_SESSION_TIMEOUT;
use serial_test::serial;
use std::env;
use std::io::Write;

const BIN: &str = "car-catalog-web";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for key in [
            "CONFIG_FILE",
            "PORT",
            "API_BASE_URL",
            "STATIC_DIR",
            "CATALOG_SERVER__PORT",
            "CATALOG_COMPARISON__MAX_ITEMS",
            "CATALOG_CATALOG__TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults load");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.static_dir, "public");
    assert_eq!(config.catalog.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.catalog_timeout().as_secs(), 3);
    assert_eq!(config.comparison.max_items, DEFAULT_MAX_COMPARISONS);
    assert_eq!(config.session_ttl(), DEFAULT_SESSION_TIMEOUT);
    assert_eq!(config.session.cookie_name, "catalog_session");
}

#[test]
#[serial]
fn test_api_base_url_env() {
    clear_env_vars();
    unsafe {
        env::set_var("API_BASE_URL", "http://catalog.internal:9000");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.catalog.base_url, "http://catalog.internal:9000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_empty_api_base_url_uses_default() {
    clear_env_vars();
    unsafe {
        env::set_var("API_BASE_URL", "  ");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.catalog.base_url, DEFAULT_API_BASE_URL);

    clear_env_vars();
}

#[test]
#[serial]
fn test_prefixed_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CATALOG_SERVER__PORT", "9090");
        env::set_var("CATALOG_COMPARISON__MAX_ITEMS", "6");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.comparison.max_items, 6);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CATALOG_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([BIN, "--port", "7000"]).expect("Failed to load config");
    assert_eq!(config.server.port, 7000);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    writeln!(
        file,
        "server:\n  port: 7070\ncatalog:\n  base_url: http://from-file:3000\n  timeout_secs: 5"
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config =
        AppConfig::load_from_args([BIN, "--config", path.as_str()]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.catalog.base_url, "http://from-file:3000");
    assert_eq!(config.catalog_timeout().as_secs(), 5);
    // Untouched keys keep their defaults.
    assert_eq!(config.comparison.max_items, 4);
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "/definitely/not/here.yaml"]);
    assert!(result.is_err());
}
