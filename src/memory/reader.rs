//! Typed little-endian reads from linear memory

use super::view::MemoryView;
use crate::core::types::{Address, MemoryError, MemoryResult, MemoryValue, ValueType};

/// Decodes a value of `value_type` at `address` from a borrowed buffer
pub(crate) fn decode_at(
    bytes: &[u8],
    address: Address,
    value_type: ValueType,
) -> MemoryResult<MemoryValue> {
    let width = value_type.size();
    let slot = address
        .end(width)
        .and_then(|end| bytes.get(address.as_usize()..end))
        .ok_or_else(|| MemoryError::out_of_bounds(address, width, bytes.len()))?;

    MemoryValue::from_bytes(slot, value_type)
        .ok_or_else(|| MemoryError::out_of_bounds(address, width, bytes.len()))
}

impl MemoryView {
    /// Reads a typed value
    pub fn read(&self, address: Address, value_type: ValueType) -> MemoryResult<MemoryValue> {
        self.with_bytes(|bytes| decode_at(bytes, address, value_type))?
    }

    /// Reads several locations under a single lock
    pub fn read_batch(
        &self,
        locations: &[(Address, ValueType)],
    ) -> MemoryResult<Vec<MemoryResult<MemoryValue>>> {
        self.with_bytes(|bytes| {
            locations
                .iter()
                .map(|&(address, value_type)| decode_at(bytes, address, value_type))
                .collect()
        })
    }

    /// Copies `len` raw bytes starting at `address`
    pub fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        self.with_bytes(|bytes| {
            address
                .end(len)
                .and_then(|end| bytes.get(address.as_usize()..end))
                .map(<[u8]>::to_vec)
                .ok_or_else(|| MemoryError::out_of_bounds(address, len, bytes.len()))
        })?
    }

    /// Check if `width` bytes at `address` are inside the current buffer
    pub fn is_readable(&self, address: Address, width: usize) -> bool {
        self.with_bytes(|bytes| address.end(width).map_or(false, |end| end <= bytes.len()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::linear::{share, VecMemory};

    fn view_over(bytes: Vec<u8>) -> MemoryView {
        MemoryView::attached(share(VecMemory::from_bytes(bytes))).unwrap()
    }

    #[test]
    fn test_read_little_endian() {
        let view = view_over(vec![0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF]);
        assert_eq!(
            view.read(Address::new(0), ValueType::U32).unwrap(),
            MemoryValue::U32(0x12345678)
        );
        assert_eq!(
            view.read(Address::new(4), ValueType::I16).unwrap(),
            MemoryValue::I16(-1)
        );
        assert_eq!(
            view.read(Address::new(5), ValueType::U8).unwrap(),
            MemoryValue::U8(0xFF)
        );
    }

    #[test]
    fn test_read_last_slot_and_past_end() {
        let view = view_over(vec![0; 16]);
        assert!(view.read(Address::new(12), ValueType::I32).is_ok());
        assert!(matches!(
            view.read(Address::new(13), ValueType::I32),
            Err(MemoryError::OutOfBounds { width: 4, size: 16, .. })
        ));
        assert!(matches!(
            view.read(Address::new(usize::MAX), ValueType::U8),
            Err(MemoryError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_read_detached() {
        let view = MemoryView::new();
        assert!(matches!(
            view.read(Address::new(0), ValueType::U8),
            Err(MemoryError::NotInitialized)
        ));
        assert!(!view.is_readable(Address::new(0), 1));
    }

    #[test]
    fn test_read_batch_mixes_results() {
        let view = view_over(vec![1, 0, 0, 0, 2, 0, 0, 0]);
        let results = view
            .read_batch(&[
                (Address::new(0), ValueType::I32),
                (Address::new(6), ValueType::I32),
                (Address::new(4), ValueType::U8),
            ])
            .unwrap();
        assert_eq!(results[0].as_ref().unwrap(), &MemoryValue::I32(1));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap(), &MemoryValue::U8(2));
    }

    #[test]
    fn test_read_bytes_and_readability() {
        let view = view_over(vec![1, 2, 3, 4]);
        assert_eq!(view.read_bytes(Address::new(1), 2).unwrap(), vec![2, 3]);
        assert!(view.read_bytes(Address::new(3), 2).is_err());
        assert!(view.is_readable(Address::new(0), 4));
        assert!(!view.is_readable(Address::new(1), 4));
    }
}
