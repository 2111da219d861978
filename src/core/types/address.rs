//! Linear memory offset wrapper with hex parsing and display

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte offset into a linear memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub usize);

impl Address {
    /// Creates a new address from a usize value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// Returns the raw usize value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Exclusive end of an access of `width` bytes, or `None` on overflow
    pub const fn end(&self, width: usize) -> Option<usize> {
        self.0.checked_add(width)
    }

}

impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            usize::from_str_radix(hex, 16)
        } else if let Some(hex) = s.strip_prefix('$') {
            usize::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            usize::from_str_radix(s, 16)
        } else {
            s.parse::<usize>()
        };

        value
            .map(Address::new)
            .map_err(|_| MemoryError::InvalidAddress(s.to_string()))
    }
}

/// Parses an address from user input
pub fn parse_address(s: &str) -> MemoryResult<Address> {
    s.parse()
}

/// Formats an offset as `0x` followed by 8 uppercase hex digits
pub fn format_address(address: Address) -> String {
    address.to_string()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        assert_eq!(Address::from_str("0x1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("0X1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("$1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("BEEF").unwrap(), Address::new(0xBEEF));
        assert_eq!(Address::from_str("4096").unwrap(), Address::new(4096));
        assert!(Address::from_str("0xZZ").is_err());
        assert!(Address::from_str("").is_err());
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0xBEEF);
        assert_eq!(format!("{}", addr), "0x0000BEEF");
        assert_eq!(format_address(Address::new(0)), "0x00000000");
        assert_eq!(format_address(Address::new(0x1234ABCD)), "0x1234ABCD");
    }

    #[test]
    fn test_address_end() {
        assert_eq!(Address::new(12).end(4), Some(16));
        assert_eq!(Address::new(usize::MAX).end(1), None);
    }
}
