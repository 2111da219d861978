//! Configuration loader for wasm-memscan
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::memory::scanner::ScanOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scanner")]
    pub scanner: ScannerConfig,

    #[serde(default = "default_memory")]
    pub memory: MemoryConfig,

    #[serde(default = "default_clock")]
    pub clock: ClockConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

/// Built-in linear memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_initial_pages")]
    pub initial_pages: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

/// Virtual clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_rate")]
    pub default_rate: f64,
    #[serde(default = "default_autopause")]
    pub autopause: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl ScannerConfig {
    /// Scan options built from this section
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_results: self.max_results,
            chunk_size: self.chunk_size,
            cancel: None,
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is missing
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

// Default functions for serde
fn default_scanner() -> ScannerConfig {
    let defaults = default_config();
    ScannerConfig {
        max_results: defaults.scanner.max_results,
        chunk_size: defaults.scanner.chunk_size,
        display_limit: defaults.scanner.display_limit,
    }
}

fn default_memory() -> MemoryConfig {
    let defaults = default_config();
    MemoryConfig {
        initial_pages: defaults.memory.initial_pages,
        max_pages: defaults.memory.max_pages,
    }
}

fn default_clock() -> ClockConfig {
    let defaults = default_config();
    ClockConfig {
        default_rate: defaults.clock.default_rate,
        autopause: defaults.clock.autopause,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_max_results() -> usize {
    default_config().scanner.max_results
}

fn default_chunk_size() -> usize {
    default_config().scanner.chunk_size
}

fn default_display_limit() -> usize {
    default_config().scanner.display_limit
}

fn default_initial_pages() -> u32 {
    default_config().memory.initial_pages
}

fn default_max_pages() -> u32 {
    default_config().memory.max_pages
}

fn default_rate() -> f64 {
    default_config().clock.default_rate
}

fn default_autopause() -> bool {
    default_config().clock.autopause
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scanner: default_scanner(),
            memory: default_memory(),
            clock: default_clock(),
            logging: default_logging(),
        }
    }
}
