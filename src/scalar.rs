//! Fixed-width big-endian codec for scalar field types.
//!
//! Each supported type reads and writes exactly its own width (1, 2, 4 or 8
//! bytes), most significant byte first. Anything else must declare a custom
//! codec or the operation fails with [`WireError::UnsupportedType`].

use crate::error::WireError;
use crate::value::{FieldType, Value};
use std::io::{Read, Write};

/// Reads one fixed-width value of the declared `ty` from `reader`.
pub fn read_scalar(reader: &mut dyn Read, ty: FieldType) -> Result<Value, WireError> {
    match ty {
        FieldType::U8 => Ok(Value::U8(u8::from_be_bytes(read_array(reader)?))),
        FieldType::I8 => Ok(Value::I8(i8::from_be_bytes(read_array(reader)?))),
        FieldType::U16 => Ok(Value::U16(u16::from_be_bytes(read_array(reader)?))),
        FieldType::I16 => Ok(Value::I16(i16::from_be_bytes(read_array(reader)?))),
        FieldType::U32 => Ok(Value::U32(u32::from_be_bytes(read_array(reader)?))),
        FieldType::I32 => Ok(Value::I32(i32::from_be_bytes(read_array(reader)?))),
        FieldType::U64 => Ok(Value::U64(u64::from_be_bytes(read_array(reader)?))),
        FieldType::I64 => Ok(Value::I64(i64::from_be_bytes(read_array(reader)?))),
        FieldType::Str => Err(WireError::UnsupportedType { ty }),
    }
}

/// Writes one fixed-width value to `writer`.
pub fn write_scalar(writer: &mut dyn Write, value: &Value) -> Result<(), WireError> {
    match value {
        Value::U8(v) => writer.write_all(&v.to_be_bytes())?,
        Value::I8(v) => writer.write_all(&v.to_be_bytes())?,
        Value::U16(v) => writer.write_all(&v.to_be_bytes())?,
        Value::I16(v) => writer.write_all(&v.to_be_bytes())?,
        Value::U32(v) => writer.write_all(&v.to_be_bytes())?,
        Value::I32(v) => writer.write_all(&v.to_be_bytes())?,
        Value::U64(v) => writer.write_all(&v.to_be_bytes())?,
        Value::I64(v) => writer.write_all(&v.to_be_bytes())?,
        Value::Str(_) => {
            return Err(WireError::UnsupportedType {
                ty: FieldType::Str,
            })
        }
    }
    Ok(())
}

fn read_array<const N: usize>(reader: &mut dyn Read) -> Result<[u8; N], WireError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(WireError::from_io)?;
    Ok(buf)
}
