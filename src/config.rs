//! Layered application configuration.
//!
//! Settings are merged from, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file (`--config <FILE>`, or `config.toml` in the platform
//!    config directory)
//! 3. `BLOCKDUPE_*` environment variables
//! 4. Command-line flags ([`Config::apply_cli`])
//!
//! # Example
//!
//! ```toml
//! block_size = 65536
//! algorithm = "xxh3"
//! min_size = 1024
//! masks = ["*.jpg", "*.png"]
//! exclude = ["/home/me/.cache"]
//! parallel = true
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};
use crate::hasher::HashAlgorithm;
use crate::scanner::WalkerConfig;

/// Default number of bytes read per block.
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "BLOCKDUPE_";

/// Errors from loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Block size must be at least one byte.
    #[error("Block size must be greater than zero")]
    ZeroBlockSize,

    /// A setting holds a value that cannot be used.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue {
        /// Name of the setting
        key: String,
        /// Why it was rejected
        message: String,
    },

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The config file or environment could not be parsed.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytes read from each file per comparison round
    pub block_size: usize,
    /// Hash applied to each block
    pub algorithm: HashAlgorithm,
    /// Smallest file size to consider
    pub min_size: u64,
    /// Largest file size to consider
    pub max_size: Option<u64>,
    /// Levels of subdirectories to descend into (0 = only the given directories)
    pub max_depth: Option<usize>,
    /// Directories excluded from the scan
    pub exclude: Vec<PathBuf>,
    /// File name masks; empty means all files
    pub masks: Vec<String>,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Compare size buckets in parallel
    pub parallel: bool,
    /// Report format
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            algorithm: HashAlgorithm::default(),
            min_size: 1,
            max_size: None,
            max_depth: None,
            exclude: Vec::new(),
            masks: Vec::new(),
            skip_hidden: false,
            parallel: false,
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from the file at `path`, or the default location.
    ///
    /// A missing default file is not an error. A missing explicit file is.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for a missing explicit file and
    /// [`ConfigError::Load`] if the file or environment cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_path(path)
            }
            None => match Self::config_path() {
                Some(path) => Self::load_from_path(&path),
                None => {
                    log::debug!("No config directory available, using defaults");
                    Ok(Self::figment(None).extract()?)
                }
            },
        }
    }

    /// Load configuration with `path` as the file layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file or environment cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading configuration from {}", path.display());
        Ok(Self::figment(Some(path)).extract()?)
    }

    /// Build the layered figment without CLI overrides.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Platform-specific location of `config.toml`.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockdupe", "blockdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Override settings with flags given on the command line.
    ///
    /// Only flags the user actually passed take effect. Repeatable flags
    /// replace the configured list rather than extending it.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(block_size) = cli.block_size {
            self.block_size = block_size;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }
        if cli.max_size.is_some() {
            self.max_size = cli.max_size;
        }
        if cli.depth.is_some() {
            self.max_depth = cli.depth;
        }
        if !cli.exclude.is_empty() {
            self.exclude.clone_from(&cli.exclude);
        }
        if !cli.masks.is_empty() {
            self.masks.clone_from(&cli.masks);
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
        self.skip_hidden |= cli.skip_hidden;
        self.parallel |= cli.parallel;
    }

    /// Check the merged settings for values the scan cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBlockSize`] or [`ConfigError::InvalidValue`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if let Some(max_size) = self.max_size {
            if max_size < self.min_size {
                return Err(ConfigError::InvalidValue {
                    key: "max_size".to_string(),
                    message: format!(
                        "{} is smaller than min_size {}",
                        max_size, self.min_size
                    ),
                });
            }
        }
        Ok(())
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            max_depth: self.max_depth,
            min_size: self.min_size,
            max_size: self.max_size,
            exclude: self.exclude.clone(),
            masks: self.masks.clone(),
            skip_hidden: self.skip_hidden,
        }
    }
}
