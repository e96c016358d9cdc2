//! Field descriptors, the record trait, and the record serializer.
//!
//! Wire envelope for every record:
//!
//! ```text
//! +----------------------+---------------------------------------+
//! | VarInt32(body_len)   | body                                  |
//! | 1..5 bytes           | fields in ascending declared order    |
//! +----------------------+---------------------------------------+
//! ```
//!
//! Each field is encoded by its custom codec when one is declared, otherwise
//! by the fixed-width big-endian scalar codec.

use crate::codec::CodecId;
use crate::error::WireError;
use crate::registry::CodecRegistry;
use crate::scalar;
use crate::value::{FieldType, Value};
use crate::varint;
use bytes::BytesMut;
use std::io::{Read, Write};
use tracing::trace;

/// Per-field serialization metadata.
///
/// `order` drives wire position; declaration order in the slice is
/// irrelevant. Keys are arbitrary integers, negative values included, so a
/// shared header field can sort before every packet-specific field. A field
/// with `set: None` can be written but never read back.
pub struct FieldDescriptor<R> {
    /// Field name, used in error reporting only.
    pub name: &'static str,
    /// Sort key deciding the field's wire position.
    pub order: i32,
    /// Declared wire type.
    pub ty: FieldType,
    /// Custom codec overriding the fixed-width scalar encoding.
    pub codec: Option<CodecId>,
    /// Captures the field's current value out of a record.
    pub get: fn(&R) -> Value,
    /// Assigns a decoded value into a record.
    pub set: Option<fn(&mut R, Value) -> Result<(), WireError>>,
}

/// A record type that can travel over the wire.
///
/// Implementations declare a static descriptor per serialized field; the
/// serializer sorts them by `order` on each pass, so the slice itself may be
/// in any order.
pub trait Record: Default + 'static {
    fn fields() -> &'static [FieldDescriptor<Self>];
}

/// Reads and writes [`Record`]s using the length-prefixed envelope.
pub struct RecordSerializer {
    registry: CodecRegistry,
}

impl RecordSerializer {
    pub fn new(registry: CodecRegistry) -> Self {
        Self { registry }
    }

    /// Serializes `record` into `dst`.
    ///
    /// The body is staged in memory first so the length prefix can be
    /// emitted ahead of it; a failure while encoding any field therefore
    /// leaves `dst` untouched.
    pub fn write<R: Record, W: Write>(
        &mut self,
        dst: &mut W,
        record: &R,
    ) -> Result<(), WireError> {
        let mut body: Vec<u8> = Vec::new();

        for descriptor in ordered_fields::<R>() {
            trace!(
                field = descriptor.name,
                order = descriptor.order,
                "encoding field"
            );
            let value = (descriptor.get)(record);
            match descriptor.codec {
                Some(id) => self.registry.resolve(id)?.write(&mut body, &value)?,
                None => scalar::write_scalar(&mut body, &value)?,
            }
        }

        varint::write_i32(dst, body.len() as i32)?;
        dst.write_all(&body)?;
        Ok(())
    }

    /// Serializes an optional record, failing with [`WireError::NullRecord`]
    /// when the record is absent.
    pub fn write_opt<R: Record, W: Write>(
        &mut self,
        dst: &mut W,
        record: Option<&R>,
    ) -> Result<(), WireError> {
        match record {
            Some(record) => self.write(dst, record),
            None => Err(WireError::NullRecord),
        }
    }

    /// Reads one record from `src`.
    ///
    /// The length prefix is read and discarded: framing relies on every
    /// field codec consuming exactly the bytes it wrote, so a codec that
    /// over- or under-reads desynchronizes the stream without detection.
    pub fn read<R: Record, S: Read>(&mut self, src: &mut S) -> Result<R, WireError> {
        let mut record = R::default();

        // Reserved for future framing use; not validated against the body.
        let _ = varint::read_i32(src)?;

        for descriptor in ordered_fields::<R>() {
            trace!(
                field = descriptor.name,
                order = descriptor.order,
                "decoding field"
            );
            let value = match descriptor.codec {
                Some(id) => self.registry.resolve(id)?.read(src, descriptor.ty)?,
                None => scalar::read_scalar(src, descriptor.ty)?,
            };
            let set = descriptor.set.ok_or(WireError::ReadOnlyField {
                field: descriptor.name,
            })?;
            set(&mut record, value)?;
        }

        Ok(record)
    }

    /// Serializes `record` into a fresh buffer.
    pub fn to_bytes<R: Record>(&mut self, record: &R) -> Result<BytesMut, WireError> {
        let mut buf = Vec::new();
        self.write(&mut buf, record)?;
        Ok(BytesMut::from(&buf[..]))
    }

    /// Reads one record from the front of `bytes`.
    pub fn from_bytes<R: Record>(&mut self, bytes: &[u8]) -> Result<R, WireError> {
        let mut cursor = bytes;
        self.read(&mut cursor)
    }

    /// The registry backing this serializer.
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }
}

impl Default for RecordSerializer {
    fn default() -> Self {
        Self::new(CodecRegistry::default())
    }
}

fn ordered_fields<R: Record>() -> Vec<&'static FieldDescriptor<R>> {
    let mut fields: Vec<_> = R::fields().iter().collect();
    fields.sort_by_key(|descriptor| descriptor.order);
    fields
}
