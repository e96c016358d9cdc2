//! Serialization error types.

use crate::value::FieldType;
use thiserror::Error;

/// Errors raised while encoding or decoding records.
#[derive(Debug, Error)]
pub enum WireError {
    /// Continuation bit still set after the domain's maximum byte count.
    #[error("malformed VarInt: continuation bit still set after {max_len} bytes")]
    MalformedVarInt { max_len: usize },

    /// The stream ended before a VarInt or fixed-width field was complete.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// A field type with no built-in encoding and no custom codec.
    #[error("type {ty} has no built-in encoding and no custom codec")]
    UnsupportedType { ty: FieldType },

    /// A codec id that does not resolve, or a codec that produced a value of
    /// the wrong type for its field.
    #[error("codec contract violation: {reason}")]
    CodecContractViolation { reason: String },

    /// A field descriptor with no setter was encountered during read.
    #[error("field {field} cannot be assigned during read")]
    ReadOnlyField { field: &'static str },

    /// A write was requested for an absent record.
    #[error("cannot write an absent record")]
    NullRecord,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// Folds `ErrorKind::UnexpectedEof` into the protocol-level EOF variant
    /// so callers see one error for an exhausted stream regardless of which
    /// read primitive hit it.
    pub(crate) fn from_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            WireError::UnexpectedEof
        } else {
            WireError::Io(err)
        }
    }
}
