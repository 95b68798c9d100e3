//! Beanwalk reflection layer
//!
//! Runtime metadata for plain data types whose shape is registered up front:
//! superclass chains, interface closures, getter/setter indices, property
//! fields, and name-driven reads and writes of field values.
//!
//! # Example
//!
//! ```ignore
//! use beanwalk_reflect::{Reflector, TypeBuilder, TypeKey};
//!
//! #[derive(Default)]
//! struct User { id: i64, name: String }
//!
//! let reflector = Reflector::new();
//! reflector.register(
//!     TypeBuilder::<User>::class("User")
//!         .property::<i64>("id", |u| &u.id, |u| &mut u.id)
//!         .property::<String>("name", |u| &u.name, |u| &mut u.name)
//!         .build(),
//! )?;
//!
//! let mut user = User::default();
//! reflector.write(&mut user, "name", "ada".to_string())?;
//! assert_eq!(reflector.read::<String>(&user, "name")?, "ada");
//! ```
//!
//! All views are computed once per type and cached for the life of the
//! [`Reflector`]. [`Reflector::global`] is the process-wide instance;
//! [`Reflector::new`] builds an isolated one.

#![warn(missing_docs)]

pub mod accessor;
pub mod builder;
pub mod cache;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod hierarchy;
pub mod registry;
pub mod value;

use std::any::Any;

use once_cell::sync::Lazy;

pub use accessor::{property_name, AccessorEntry, AccessorRole};
pub use builder::{accessor_name, TypeBuilder};
pub use cache::{AccessorMap, AncestorChain, CacheStats, FieldMap, InterfaceClosure, MetadataCache};
pub use descriptor::{Constructor, FieldDesc, MethodDesc, Superclass, TypeDesc, TypeKey, TypeKind};
pub use error::{ReflectError, ReflectResult};
pub use field::{FieldEntry, SERIAL_VERSION_MARKER};
pub use registry::TypeRegistry;

// ============================================================================
// Reflect trait
// ============================================================================

/// Types that can describe themselves.
///
/// Implementing this lets a type be registered with
/// [`Reflector::register_type`] instead of passing a descriptor by hand.
pub trait Reflect: Any {
    /// Build the descriptor for `Self`
    fn describe() -> TypeDesc;
}

// ============================================================================
// Reflector
// ============================================================================

static GLOBAL: Lazy<Reflector> = Lazy::new(Reflector::new);

/// Registry plus metadata caches
pub struct Reflector {
    pub(crate) registry: TypeRegistry,
    pub(crate) cache: MetadataCache,
}

impl Reflector {
    /// Create an isolated reflector with no registered types
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            cache: MetadataCache::new(),
        }
    }

    /// Process-wide reflector, created on first use and never cleared
    pub fn global() -> &'static Reflector {
        &GLOBAL
    }

    /// Register a type descriptor
    pub fn register(&self, desc: TypeDesc) -> ReflectResult<TypeKey> {
        self.registry.register(desc)
    }

    /// Register `T` from its own [`Reflect`] description
    pub fn register_type<T: Reflect>(&self) -> ReflectResult<TypeKey> {
        self.registry.register(T::describe())
    }

    /// Underlying type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Snapshot of cache table sizes
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Build a new instance of `ty` with its zero-argument constructor
    pub fn instantiate(&self, ty: TypeKey) -> ReflectResult<Box<dyn Any + Send>> {
        let desc = self.registry.require(ty)?;
        let construct = desc
            .constructor()
            .ok_or_else(|| ReflectError::MissingDefaultConstructor {
                name: desc.name().to_string(),
            })?;
        Ok(construct())
    }
}

impl Default for Reflector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Reflector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reflector")
            .field("types", &self.registry.len())
            .field("cache", &self.cache.stats())
            .finish()
    }
}
