//! Core module containing fundamental types for wasm-memscan
//!
//! This module provides the foundational building blocks used throughout
//! the crate: addresses, typed values, scan candidates and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, Comparison, MemoryError, MemoryResult, MemoryValue, ScanCandidate, ScanSession,
    ValueType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// Human readable byte count (`bytes`, `KB`, `MB`)
pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(65536), "64.00 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.00 MB");
    }
}
