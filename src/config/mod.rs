//! Configuration module for wasm-memscan
//!
//! Provides configuration loading, validation, and default settings.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::ConfigLoader;
pub use validator::{validate_config, ConfigValidator};

// Re-export the configuration structures
pub use loader::{ClockConfig, Config, LoggingConfig, MemoryConfig, ScannerConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
