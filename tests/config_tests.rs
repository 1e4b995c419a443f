//! Integration tests for layered configuration.
//!
//! These tests verify the full configuration stack: defaults, TOML file
//! parsing, environment variable overrides, CLI flag overrides and
//! validation.

use blockdupe::cli::{Cli, OutputFormat};
use blockdupe::config::{Config, ConfigError};
use blockdupe::hasher::HashAlgorithm;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all BLOCKDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("BLOCKDUPE_") {
            std::env::remove_var(key);
        }
    }
}

fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

// =============================================================================
// File layer
// =============================================================================

#[test]
fn test_empty_file_gives_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("");

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config(
        r#"
block_size = 65536
algorithm = "xxh3"
min_size = 1024
max_depth = 2
masks = ["*.jpg", "*.PNG"]
exclude = ["/tmp/cache"]
skip_hidden = true
parallel = true
output = "json"
"#,
    );

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.block_size, 65536);
    assert_eq!(config.algorithm, HashAlgorithm::Xxh3);
    assert_eq!(config.min_size, 1024);
    assert_eq!(config.max_size, None);
    assert_eq!(config.max_depth, Some(2));
    assert_eq!(config.masks, vec!["*.jpg", "*.PNG"]);
    assert_eq!(config.exclude, vec![PathBuf::from("/tmp/cache")]);
    assert!(config.skip_hidden);
    assert!(config.parallel);
    assert_eq!(config.output, OutputFormat::Json);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Config::load(Some(&path));

    assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == path));
}

#[test]
fn test_malformed_file_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("block_size = [not toml");

    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::Load(_))
    ));
}

#[test]
fn test_unknown_algorithm_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config(r#"algorithm = "rot13""#);

    let err = Config::load_from_path(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Load(_)));
    assert!(err.to_string().contains("rot13"));
}

#[test]
fn test_zero_block_size_from_file_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("block_size = 0");

    let config = Config::load_from_path(&path).unwrap();

    assert!(matches!(config.validate(), Err(ConfigError::ZeroBlockSize)));
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("block_size = 1024\nalgorithm = \"md5\"");
    std::env::set_var("BLOCKDUPE_BLOCK_SIZE", "8192");
    std::env::set_var("BLOCKDUPE_PARALLEL", "true");

    let config = Config::load_from_path(&path);
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.block_size, 8192);
    assert!(config.parallel);
    assert_eq!(config.algorithm, HashAlgorithm::Md5);
}

#[test]
fn test_cli_overrides_env_and_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("algorithm = \"md5\"\nmin_size = 10\nmasks = [\"*.txt\"]");
    std::env::set_var("BLOCKDUPE_ALGORITHM", "sha256");

    let config = Config::load_from_path(&path);
    clear_env();
    let mut config = config.unwrap();
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);

    let cli = Cli::try_parse_from([
        "blockdupe",
        "-a",
        "crc32",
        "-m",
        "*.jpg",
        "-o",
        "json",
        "/data",
    ])
    .unwrap();
    config.apply_cli(&cli);

    assert_eq!(config.algorithm, HashAlgorithm::Crc32);
    assert_eq!(config.masks, vec!["*.jpg"]);
    assert_eq!(config.output, OutputFormat::Json);
    // Not given on the command line, so the file value stays
    assert_eq!(config.min_size, 10);
}

#[test]
fn test_cli_flags_cannot_unset_file_booleans() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("skip_hidden = true");

    let mut config = Config::load_from_path(&path).unwrap();
    let cli = Cli::try_parse_from(["blockdupe", "/data"]).unwrap();
    config.apply_cli(&cli);

    assert!(config.skip_hidden);
}

#[test]
fn test_walker_config_from_loaded_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let (_dir, path) = write_config("max_size = 4096\nmin_size = 16");

    let config = Config::load_from_path(&path).unwrap();
    let walker = config.walker_config();

    assert_eq!(walker.min_size, 16);
    assert_eq!(walker.max_size, Some(4096));
}
