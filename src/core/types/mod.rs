//! Core type definitions for wasm-memscan
//!
//! Address wrappers, typed memory values, scan candidates and sessions,
//! and the error type shared by every module.

mod address;
mod error;
mod scan_result;
mod value;

// Re-export all public types
pub use address::{format_address, parse_address, Address};
pub use error::{MemoryError, MemoryResult};
pub use scan_result::{Comparison, ScanCandidate, ScanSession, ScanStep, StepKind};
pub use value::{parse_number, MemoryValue, ValueType};

/// WebAssembly page size in bytes
pub const PAGE_SIZE: usize = 65536;

/// Largest page count a 32-bit linear memory can reach
pub const MAX_PAGES: u32 = 65536;
