//! Configuration validator for wasm-memscan
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{ClockConfig, Config, ConfigError, LoggingConfig, MemoryConfig, ScannerConfig};
use crate::core::types::MAX_PAGES;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_scanner(&config.scanner)?;
        Self::validate_memory(&config.memory)?;
        Self::validate_clock(&config.clock)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates scanner configuration
    fn validate_scanner(scanner: &ScannerConfig) -> Result<(), ConfigError> {
        if scanner.max_results == 0 {
            return Err(ConfigError::Invalid(
                "Scanner max_results must be at least 1".to_string(),
            ));
        }

        // Chunks must hold a whole number of every value width
        if scanner.chunk_size < 8 || !scanner.chunk_size.is_power_of_two() {
            return Err(ConfigError::Invalid(
                "Chunk size must be a power of 2 and at least 8".to_string(),
            ));
        }

        if scanner.display_limit == 0 {
            return Err(ConfigError::Invalid(
                "Display limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates memory configuration
    fn validate_memory(memory: &MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_pages > MAX_PAGES {
            return Err(ConfigError::Invalid(format!(
                "Maximum pages cannot exceed {}",
                MAX_PAGES
            )));
        }

        if memory.initial_pages > memory.max_pages {
            return Err(ConfigError::Invalid(
                "Initial pages cannot exceed maximum pages".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates clock configuration
    fn validate_clock(clock: &ClockConfig) -> Result<(), ConfigError> {
        if !(clock.default_rate.is_finite() && clock.default_rate >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "Clock rate must be finite and non-negative, got {}",
                clock.default_rate
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_max_results() {
        let mut config = Config::default();
        config.scanner.max_results = 0;
        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[test]
    fn test_invalid_chunk_size() {
        let mut config = Config::default();
        config.scanner.chunk_size = 0;
        assert!(validate_config(&config).is_err());

        config.scanner.chunk_size = 1000; // Not power of 2
        assert!(validate_config(&config).is_err());

        config.scanner.chunk_size = 4; // Smaller than an f64
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_pages() {
        let mut config = Config::default();
        config.memory.max_pages = 65537;
        assert!(validate_config(&config).is_err());

        config.memory.max_pages = 2;
        config.memory.initial_pages = 3;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_rate() {
        let mut config = Config::default();
        config.clock.default_rate = -1.0;
        assert!(validate_config(&config).is_err());

        config.clock.default_rate = f64::INFINITY;
        assert!(validate_config(&config).is_err());

        config.clock.default_rate = 0.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("log level"));
    }

    #[test]
    fn test_edge_cases() {
        let mut config = Config::default();
        config.scanner.max_results = 1;
        config.scanner.chunk_size = 8;
        config.scanner.display_limit = 1;
        config.memory.initial_pages = 0;
        config.memory.max_pages = 0;
        assert!(validate_config(&config).is_ok());

        config.memory.max_pages = 65536;
        config.memory.initial_pages = 65536;
        assert!(validate_config(&config).is_ok());
    }
}
