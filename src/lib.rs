//! # recwire
//!
//! Binary record (de)serialization for length-prefixed, field-ordered wire
//! formats.
//!
//! This crate provides:
//! - A VarInt codec (7 payload bits + continuation bit per byte) for signed
//!   32- and 64-bit integers, over slices and byte streams
//! - A fixed-width big-endian codec for the built-in scalar types
//! - A pluggable custom codec contract with a lazy, factory-backed registry
//! - A record serializer that walks a type's ordered field descriptors and
//!   wraps the encoded body in a VarInt length prefix
//!
//! Record types declare their wire layout once, as a static slice of
//! [`FieldDescriptor`]s: each descriptor names the field, its serialization
//! order, its declared type, and an optional custom codec. The serializer
//! handles the rest; no per-type marshalling code is written by hand.

pub mod codec;
pub mod error;
pub mod record;
pub mod registry;
pub mod scalar;
pub mod value;
pub mod varint;

pub use codec::{CodecId, FieldCodec, StringCodec, VarIntCodec};
pub use error::WireError;
pub use record::{FieldDescriptor, Record, RecordSerializer};
pub use registry::{BuiltinFactory, CodecFactory, CodecRegistry};
pub use value::{FieldType, Value};
pub use varint::{MAX_VARINT32_LEN, MAX_VARINT64_LEN};
