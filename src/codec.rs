//! Custom field codec contract and the codecs that ship with the crate.

use crate::error::WireError;
use crate::value::{FieldType, Value};
use crate::varint;
use std::fmt;
use std::io::{Read, Write};

/// Identifier naming a custom codec in a field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecId(pub &'static str);

impl CodecId {
    /// Built-in VarInt codec for `i32`/`i64` fields.
    pub const VARINT: CodecId = CodecId("varint");

    /// Built-in UTF-8, length-prefixed string codec.
    pub const STRING: CodecId = CodecId("string");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract every custom field codec implements.
///
/// A codec owns its byte layout and is trusted to consume exactly the bytes
/// it wrote; the serializer does not validate framing around it.
pub trait FieldCodec {
    /// Reads one value from the stream. `ty` is the field's declared type,
    /// passed as a hint for codecs that handle more than one type.
    fn read(&self, reader: &mut dyn Read, ty: FieldType) -> Result<Value, WireError>;

    /// Writes one value to the stream.
    fn write(&self, writer: &mut dyn Write, value: &Value) -> Result<(), WireError>;
}

/// Encodes `i32`/`i64` fields as VarInts instead of fixed-width.
///
/// Enum-typed fields travel this way too: the record declares them as `I32`
/// (or `I64`) and converts in its accessors.
#[derive(Debug, Default)]
pub struct VarIntCodec;

impl FieldCodec for VarIntCodec {
    fn read(&self, reader: &mut dyn Read, ty: FieldType) -> Result<Value, WireError> {
        match ty {
            FieldType::I32 => Ok(Value::I32(varint::read_i32(reader)?.0)),
            FieldType::I64 => Ok(Value::I64(varint::read_i64(reader)?.0)),
            other => Err(WireError::UnsupportedType { ty: other }),
        }
    }

    fn write(&self, writer: &mut dyn Write, value: &Value) -> Result<(), WireError> {
        match value {
            Value::I32(v) => varint::write_i32(writer, *v),
            Value::I64(v) => varint::write_i64(writer, *v),
            other => Err(WireError::UnsupportedType {
                ty: other.field_type(),
            }),
        }
    }
}

/// UTF-8 string codec: a VarInt32 byte length followed by the bytes.
#[derive(Debug, Default)]
pub struct StringCodec;

impl FieldCodec for StringCodec {
    fn read(&self, reader: &mut dyn Read, ty: FieldType) -> Result<Value, WireError> {
        if ty != FieldType::Str {
            return Err(WireError::UnsupportedType { ty });
        }

        let (len, _) = varint::read_i32(reader)?;
        let len = usize::try_from(len).map_err(|_| WireError::CodecContractViolation {
            reason: format!("negative string length {len}"),
        })?;

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).map_err(WireError::from_io)?;

        let text = String::from_utf8(buf).map_err(|_| WireError::CodecContractViolation {
            reason: "string payload is not valid UTF-8".to_string(),
        })?;
        Ok(Value::Str(text))
    }

    fn write(&self, writer: &mut dyn Write, value: &Value) -> Result<(), WireError> {
        match value {
            Value::Str(text) => {
                varint::write_i32(writer, text.len() as i32)?;
                writer.write_all(text.as_bytes())?;
                Ok(())
            }
            other => Err(WireError::UnsupportedType {
                ty: other.field_type(),
            }),
        }
    }
}
