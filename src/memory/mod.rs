//! Linear memory access, comparison and scanning
//!
//! This module provides:
//! - A pluggable linear memory handle with an in-process implementation
//! - A bounds-checked, little-endian typed view that tracks memory growth
//! - Comparison predicates for scan steps
//! - Full scans and incremental narrowing over a scan session

pub mod comparator;
pub mod linear;
pub mod reader;
pub mod scanner;
pub mod view;
pub mod writer;

pub use comparator::{compare, compare_values};
pub use linear::{share, LinearMemory, SharedMemory, VecMemory};
pub use scanner::{narrow, scan, ScanCancel, ScanOptions, ScanReport};
pub use view::{GrowEvent, GrowListener, MemoryView};
