//! Field type tags and tagged runtime values.
//!
//! Every record field declares a [`FieldType`]; the serializer moves field
//! contents around as [`Value`]s carrying the same tag. Custom codecs receive
//! the declared tag as a read hint and are expected to return a matching
//! variant.

use crate::error::WireError;
use std::fmt;

/// Declared wire type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Str,
}

impl FieldType {
    /// Encoded width in bytes for fixed-width types, `None` for
    /// variable-width types that require a custom codec.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldType::U8 | FieldType::I8 => Some(1),
            FieldType::U16 | FieldType::I16 => Some(2),
            FieldType::U32 | FieldType::I32 => Some(4),
            FieldType::U64 | FieldType::I64 => Some(8),
            FieldType::Str => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::U8 => write!(f, "u8"),
            FieldType::I8 => write!(f, "i8"),
            FieldType::U16 => write!(f, "u16"),
            FieldType::I16 => write!(f, "i16"),
            FieldType::U32 => write!(f, "u32"),
            FieldType::I32 => write!(f, "i32"),
            FieldType::U64 => write!(f, "u64"),
            FieldType::I64 => write!(f, "i64"),
            FieldType::Str => write!(f, "string"),
        }
    }
}

/// A field value captured out of, or destined for, a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Str(String),
}

macro_rules! try_into_fn {
    ($name:ident, $variant:ident, $ty:ty) => {
        /// Unwraps the value, failing with a codec contract violation when
        /// the variant does not match.
        pub fn $name(self) -> Result<$ty, WireError> {
            match self {
                Value::$variant(v) => Ok(v),
                other => Err(other.mismatch(FieldType::$variant)),
            }
        }
    };
}

impl Value {
    /// Returns the tag matching this value's variant.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::U8(_) => FieldType::U8,
            Value::I8(_) => FieldType::I8,
            Value::U16(_) => FieldType::U16,
            Value::I16(_) => FieldType::I16,
            Value::U32(_) => FieldType::U32,
            Value::I32(_) => FieldType::I32,
            Value::U64(_) => FieldType::U64,
            Value::I64(_) => FieldType::I64,
            Value::Str(_) => FieldType::Str,
        }
    }

    try_into_fn!(try_into_u8, U8, u8);
    try_into_fn!(try_into_i8, I8, i8);
    try_into_fn!(try_into_u16, U16, u16);
    try_into_fn!(try_into_i16, I16, i16);
    try_into_fn!(try_into_u32, U32, u32);
    try_into_fn!(try_into_i32, I32, i32);
    try_into_fn!(try_into_u64, U64, u64);
    try_into_fn!(try_into_i64, I64, i64);
    try_into_fn!(try_into_string, Str, String);

    fn mismatch(self, expected: FieldType) -> WireError {
        WireError::CodecContractViolation {
            reason: format!(
                "expected a {} value, got {}",
                expected,
                self.field_type()
            ),
        }
    }
}
