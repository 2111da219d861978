//! Default configuration values for wasm-memscan

use crate::memory::scanner::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RESULTS};
use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scanner: ScannerDefaults,
    pub memory: MemoryDefaults,
    pub clock: ClockDefaults,
    pub logging: LoggingDefaults,
}

/// Default scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefaults {
    pub max_results: usize,
    pub chunk_size: usize,
    pub display_limit: usize,
}

/// Default memory configuration for the built-in linear memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub initial_pages: u32,
    pub max_pages: u32,
}

/// Default clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockDefaults {
    pub default_rate: f64,
    pub autopause: bool,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scanner: ScannerDefaults {
            max_results: DEFAULT_MAX_RESULTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            display_limit: 100,
        },
        memory: MemoryDefaults {
            initial_pages: 1,
            max_pages: 65536, // 4 GiB
        },
        clock: ClockDefaults {
            default_rate: 1.0,
            autopause: false,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_defaults() {
        let config = default_config();
        assert_eq!(config.scanner.max_results, 10_000);
        assert_eq!(config.scanner.chunk_size, 65536);
        assert_eq!(config.scanner.display_limit, 100);
    }

    #[test]
    fn test_memory_and_clock_defaults() {
        let config = default_config();
        assert_eq!(config.memory.initial_pages, 1);
        assert_eq!(config.memory.max_pages, 65536);
        assert_eq!(config.clock.default_rate, 1.0);
        assert!(!config.clock.autopause);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("max_results"));
        assert!(serialized.contains("default_rate"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.scanner.chunk_size, config.scanner.chunk_size);
        assert_eq!(deserialized.memory.max_pages, config.memory.max_pages);
    }
}
