//! Lazy codec registry backed by an injected factory.
//!
//! The registry is an explicit object owned by the serializer rather than
//! process-wide state: resolution takes `&mut self`, so one instance exists
//! per codec id for the registry's lifetime and nothing races on first use.

use crate::codec::{CodecId, FieldCodec, StringCodec, VarIntCodec};
use crate::error::WireError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Capability that produces codec instances on first reference.
pub trait CodecFactory {
    /// Returns a fresh instance for `id`, or `None` when the id does not
    /// name a codec this factory knows.
    fn instantiate(&self, id: CodecId) -> Option<Box<dyn FieldCodec>>;
}

/// Factory for the codecs that ship with the crate.
#[derive(Debug, Default)]
pub struct BuiltinFactory;

impl CodecFactory for BuiltinFactory {
    fn instantiate(&self, id: CodecId) -> Option<Box<dyn FieldCodec>> {
        match id.as_str() {
            "varint" => Some(Box::new(VarIntCodec)),
            "string" => Some(Box::new(StringCodec)),
            _ => None,
        }
    }
}

/// Resolves codec ids to cached instances.
///
/// One instance is constructed per id over the registry's lifetime; nothing
/// is ever evicted.
pub struct CodecRegistry {
    factory: Box<dyn CodecFactory>,
    cache: HashMap<CodecId, Box<dyn FieldCodec>>,
}

impl CodecRegistry {
    pub fn new(factory: Box<dyn CodecFactory>) -> Self {
        Self {
            factory,
            cache: HashMap::new(),
        }
    }

    /// Returns the cached instance for `id`, instantiating it on first use.
    pub fn resolve(&mut self, id: CodecId) -> Result<&dyn FieldCodec, WireError> {
        let codec = match self.cache.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(codec = %id, "instantiating field codec");
                let codec = self.factory.instantiate(id).ok_or_else(|| {
                    WireError::CodecContractViolation {
                        reason: format!("codec id {id} does not resolve to a field codec"),
                    }
                })?;
                entry.insert(codec)
            }
        };
        Ok(&**codec)
    }

    /// Number of codec instances resolved so far.
    pub fn resolved(&self) -> usize {
        self.cache.len()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new(Box::new(BuiltinFactory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldType, Value};
    use std::cell::Cell;
    use std::io::{Read, Write};
    use std::rc::Rc;

    struct NullCodec;

    impl FieldCodec for NullCodec {
        fn read(&self, _: &mut dyn Read, _: FieldType) -> Result<Value, WireError> {
            Ok(Value::U8(0))
        }

        fn write(&self, _: &mut dyn Write, _: &Value) -> Result<(), WireError> {
            Ok(())
        }
    }

    struct CountingFactory {
        calls: Rc<Cell<usize>>,
    }

    impl CodecFactory for CountingFactory {
        fn instantiate(&self, id: CodecId) -> Option<Box<dyn FieldCodec>> {
            self.calls.set(self.calls.get() + 1);
            if id.as_str() == "null" {
                Some(Box::new(NullCodec))
            } else {
                None
            }
        }
    }

    #[test]
    fn test_resolve_instantiates_once() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = CodecRegistry::new(Box::new(CountingFactory {
            calls: Rc::clone(&calls),
        }));

        let id = CodecId("null");
        for _ in 0..10 {
            registry.resolve(id).unwrap();
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(registry.resolved(), 1);
    }

    #[test]
    fn test_resolve_unknown_id() {
        let mut registry = CodecRegistry::default();
        let result = registry.resolve(CodecId("zlib"));
        assert!(matches!(
            result,
            Err(WireError::CodecContractViolation { .. })
        ));
        assert_eq!(registry.resolved(), 0);
    }

    #[test]
    fn test_builtin_factory_knows_shipped_codecs() {
        let factory = BuiltinFactory;
        assert!(factory.instantiate(CodecId::VARINT).is_some());
        assert!(factory.instantiate(CodecId::STRING).is_some());
        assert!(factory.instantiate(CodecId("gzip")).is_none());
    }

    #[test]
    fn test_default_registry_resolves_builtins() {
        let mut registry = CodecRegistry::default();
        registry.resolve(CodecId::VARINT).unwrap();
        registry.resolve(CodecId::STRING).unwrap();
        assert_eq!(registry.resolved(), 2);
    }
}
