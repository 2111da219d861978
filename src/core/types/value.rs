//! Typed values stored in linear memory

use super::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-width numeric value read from or written to linear memory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MemoryValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl MemoryValue {
    /// Returns the size in bytes of the value
    pub fn size(&self) -> usize {
        self.value_type().size()
    }

    /// Converts the value to little-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MemoryValue::I8(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U8(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I16(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U16(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::F32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::F64(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Decodes a little-endian value of `value_type` from the front of `bytes`
    pub fn from_bytes(bytes: &[u8], value_type: ValueType) -> Option<Self> {
        let value = match value_type {
            ValueType::I8 => MemoryValue::I8(i8::from_le_bytes(take(bytes)?)),
            ValueType::U8 => MemoryValue::U8(u8::from_le_bytes(take(bytes)?)),
            ValueType::I16 => MemoryValue::I16(i16::from_le_bytes(take(bytes)?)),
            ValueType::U16 => MemoryValue::U16(u16::from_le_bytes(take(bytes)?)),
            ValueType::I32 => MemoryValue::I32(i32::from_le_bytes(take(bytes)?)),
            ValueType::U32 => MemoryValue::U32(u32::from_le_bytes(take(bytes)?)),
            ValueType::F32 => MemoryValue::F32(f32::from_le_bytes(take(bytes)?)),
            ValueType::F64 => MemoryValue::F64(f64::from_le_bytes(take(bytes)?)),
        };
        Some(value)
    }

    /// Converts a float into the natural domain of `value_type`.
    ///
    /// Integers truncate toward zero and wrap modulo 2^bits, the way a typed
    /// array store does. Non-finite input stores 0 for integer types.
    pub fn from_f64(value: f64, value_type: ValueType) -> Self {
        match value_type {
            ValueType::I8 => MemoryValue::I8(wrap_int(value, 8) as u8 as i8),
            ValueType::U8 => MemoryValue::U8(wrap_int(value, 8) as u8),
            ValueType::I16 => MemoryValue::I16(wrap_int(value, 16) as u16 as i16),
            ValueType::U16 => MemoryValue::U16(wrap_int(value, 16) as u16),
            ValueType::I32 => MemoryValue::I32(wrap_int(value, 32) as u32 as i32),
            ValueType::U32 => MemoryValue::U32(wrap_int(value, 32) as u32),
            ValueType::F32 => MemoryValue::F32(value as f32),
            ValueType::F64 => MemoryValue::F64(value),
        }
    }

    /// Parses a user literal as a float and converts it into `value_type`
    pub fn parse_literal(literal: &str, value_type: ValueType) -> Result<Self, MemoryError> {
        parse_number(literal).map(|v| Self::from_f64(v, value_type))
    }

    /// The value widened to f64, the domain comparisons are evaluated in
    pub fn as_f64(&self) -> f64 {
        match *self {
            MemoryValue::I8(v) => v as f64,
            MemoryValue::U8(v) => v as f64,
            MemoryValue::I16(v) => v as f64,
            MemoryValue::U16(v) => v as f64,
            MemoryValue::I32(v) => v as f64,
            MemoryValue::U32(v) => v as f64,
            MemoryValue::F32(v) => v as f64,
            MemoryValue::F64(v) => v,
        }
    }

    /// Gets the value type enum for this value
    pub fn value_type(&self) -> ValueType {
        match self {
            MemoryValue::I8(_) => ValueType::I8,
            MemoryValue::U8(_) => ValueType::U8,
            MemoryValue::I16(_) => ValueType::I16,
            MemoryValue::U16(_) => ValueType::U16,
            MemoryValue::I32(_) => ValueType::I32,
            MemoryValue::U32(_) => ValueType::U32,
            MemoryValue::F32(_) => ValueType::F32,
            MemoryValue::F64(_) => ValueType::F64,
        }
    }
}

fn take<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.get(..N)?.try_into().ok()
}

fn wrap_int(value: f64, bits: i32) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(2f64.powi(bits)) as u64
}

/// Parses a user literal as a float, the way the scan input box is read
pub fn parse_number(literal: &str) -> Result<f64, MemoryError> {
    let trimmed = literal.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).map(|v| v as f64).ok(),
        None => trimmed.parse::<f64>().ok(),
    };
    parsed.ok_or_else(|| MemoryError::InvalidLiteral(literal.to_string()))
}

/// Enum representing the type of a memory value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    I8,
    U8,
    I16,
    U16,
    #[default]
    I32,
    U32,
    F32,
    F64,
}

impl ValueType {
    /// Every supported type, in menu order
    pub const ALL: [ValueType; 8] = [
        ValueType::I8,
        ValueType::U8,
        ValueType::I16,
        ValueType::U16,
        ValueType::I32,
        ValueType::U32,
        ValueType::F32,
        ValueType::F64,
    ];

    /// Returns the size in bytes for this value type
    pub const fn size(&self) -> usize {
        match self {
            ValueType::I8 | ValueType::U8 => 1,
            ValueType::I16 | ValueType::U16 => 2,
            ValueType::I32 | ValueType::U32 | ValueType::F32 => 4,
            ValueType::F64 => 8,
        }
    }

    /// Short lowercase name (`i32`, `f64`, ...)
    pub const fn name(&self) -> &'static str {
        match self {
            ValueType::I8 => "i8",
            ValueType::U8 => "u8",
            ValueType::I16 => "i16",
            ValueType::U16 => "u16",
            ValueType::I32 => "i32",
            ValueType::U32 => "u32",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
        }
    }
}

impl FromStr for ValueType {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i8" | "int8" => Ok(ValueType::I8),
            "u8" | "uint8" => Ok(ValueType::U8),
            "i16" | "int16" => Ok(ValueType::I16),
            "u16" | "uint16" => Ok(ValueType::U16),
            "i32" | "int32" => Ok(ValueType::I32),
            "u32" | "uint32" => Ok(ValueType::U32),
            "f32" | "float32" => Ok(ValueType::F32),
            "f64" | "float64" => Ok(ValueType::F64),
            _ => Err(MemoryError::InvalidValueType(s.to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::I8(v) => write!(f, "{}", v),
            MemoryValue::U8(v) => write!(f, "{}", v),
            MemoryValue::I16(v) => write!(f, "{}", v),
            MemoryValue::U16(v) => write!(f, "{}", v),
            MemoryValue::I32(v) => write!(f, "{}", v),
            MemoryValue::U32(v) => write!(f, "{}", v),
            MemoryValue::F32(v) => write!(f, "{}", v),
            MemoryValue::F64(v) => write!(f, "{}", v),
        }
    }
}
