//! Typed little-endian writes into linear memory

use super::view::MemoryView;
use crate::core::types::{Address, MemoryError, MemoryResult, MemoryValue, ValueType};
use tracing::debug;

impl MemoryView {
    /// Writes raw bytes at `address`
    pub fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        self.with_bytes_mut(|bytes| {
            let size = bytes.len();
            let slot = address
                .end(data.len())
                .and_then(|end| bytes.get_mut(address.as_usize()..end))
                .ok_or_else(|| MemoryError::out_of_bounds(address, data.len(), size))?;
            slot.copy_from_slice(data);
            Ok(())
        })?
    }

    /// Writes a typed value in little-endian order
    pub fn write(&self, address: Address, value: MemoryValue) -> MemoryResult<()> {
        self.write_bytes(address, &value.to_bytes())?;
        debug!("Wrote {} {} at {}", value.value_type(), value, address);
        Ok(())
    }

    /// Parses a user literal into `value_type` and writes it, returning what was stored
    pub fn write_literal(
        &self,
        address: Address,
        literal: &str,
        value_type: ValueType,
    ) -> MemoryResult<MemoryValue> {
        let value = MemoryValue::parse_literal(literal, value_type)?;
        self.write(address, value)?;
        Ok(value)
    }
}
