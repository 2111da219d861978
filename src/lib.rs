//! wasm-memscan: search, watch and edit the linear memory of a running
//! WebAssembly instance, and scale or pause the time it observes.
//!
//! The instance's memory is supplied as a [`memory::SharedMemory`] handle.
//! [`Inspector`] bundles the typed memory view, the scan session, the watch
//! registry and the virtual clock behind one API.

pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod inspector;
pub mod memory;
pub mod watch;

// Re-export main types from core module
pub use crate::core::types::{
    Address, Comparison, MemoryError, MemoryResult, MemoryValue, ScanCandidate, ScanSession,
    ValueType,
};

pub use clock::{Clock, ManualClock, SystemClock, VirtualClock};
pub use inspector::Inspector;
pub use watch::{Watch, WatchRegistry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_constants() {
        assert_eq!(crate::core::VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(crate::core::AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_address_reexport() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_usize(), 0x1000);
        assert_eq!(addr.to_string(), "0x00001000");
    }

    #[test]
    fn test_memory_value_reexport() {
        let value = MemoryValue::U32(42);
        assert_eq!(value.value_type(), ValueType::U32);
        assert_eq!(value.size(), 4);

        let f64_val = MemoryValue::F64(std::f64::consts::PI);
        assert_eq!(f64_val.value_type(), ValueType::F64);
    }

    #[test]
    fn test_memory_error_reexport() {
        let error = MemoryError::NotInitialized;
        assert!(error.to_string().contains("No linear memory"));

        let result: MemoryResult<u32> = Err(MemoryError::InvalidRate(-1.0));
        assert!(result.is_err());
    }
}
