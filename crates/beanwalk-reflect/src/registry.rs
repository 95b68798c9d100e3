//! Type registry
//!
//! Stores one [`TypeDesc`] per registered type. Descriptors are immutable once
//! registered; a second registration for the same type is rejected so metadata
//! cached from the first one can never go stale.

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::descriptor::{TypeDesc, TypeKey};
use crate::error::{ReflectError, ReflectResult};

/// Registry of type descriptors
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Descriptors indexed by `TypeId`
    types: RwLock<FxHashMap<TypeId, Arc<TypeDesc>>>,
}

impl TypeRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor
    pub fn register(&self, desc: TypeDesc) -> ReflectResult<TypeKey> {
        let key = desc.key();
        match self.types.write().entry(key.id()) {
            Entry::Occupied(_) => Err(ReflectError::AlreadyRegistered {
                name: key.name().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(desc));
                tracing::debug!(type_name = key.name(), "registered type");
                Ok(key)
            }
        }
    }

    /// Get the descriptor for a type
    pub fn get(&self, key: TypeKey) -> Option<Arc<TypeDesc>> {
        self.types.read().get(&key.id()).cloned()
    }

    /// Get the descriptor for a type, failing if it was never registered
    pub fn require(&self, key: TypeKey) -> ReflectResult<Arc<TypeDesc>> {
        self.get(key).ok_or_else(|| ReflectError::UnregisteredType {
            name: key.name().to_string(),
        })
    }

    /// Find the key of a registered type from its `TypeId`
    pub fn key_of(&self, id: TypeId) -> Option<TypeKey> {
        self.types.read().get(&id).map(|desc| desc.key())
    }

    /// Check if a type is registered
    pub fn contains(&self, key: TypeKey) -> bool {
        self.types.read().contains_key(&key.id())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeBuilder;

    struct Invoice;
    struct Receipt;

    #[test]
    fn test_register_and_get() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());

        let key = registry
            .register(TypeBuilder::<Invoice>::class("Invoice").build())
            .unwrap();

        assert_eq!(key, TypeKey::of::<Invoice>());
        assert!(registry.contains(key));
        assert!(!registry.contains(TypeKey::of::<Receipt>()));
        assert_eq!(registry.get(key).unwrap().name(), "Invoice");
        assert_eq!(registry.key_of(TypeId::of::<Invoice>()), Some(key));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_twice_rejected() {
        let registry = TypeRegistry::new();
        registry
            .register(TypeBuilder::<Invoice>::class("Invoice").build())
            .unwrap();

        let err = registry
            .register(TypeBuilder::<Invoice>::class("Invoice2").build())
            .unwrap_err();
        assert!(matches!(err, ReflectError::AlreadyRegistered { .. }));
        assert_eq!(registry.get(TypeKey::of::<Invoice>()).unwrap().name(), "Invoice");
    }

    #[test]
    fn test_require_unregistered() {
        let registry = TypeRegistry::new();
        match registry.require(TypeKey::of::<Receipt>()) {
            Err(ReflectError::UnregisteredType { name }) => assert!(name.ends_with("Receipt")),
            other => panic!("Expected UnregisteredType, got {:?}", other),
        }
    }
}
