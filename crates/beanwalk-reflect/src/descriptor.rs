//! Type descriptors
//!
//! A [`TypeDesc`] is the registered shape of one Rust type: its superclass
//! link, the interfaces it declares, its field slots and its named methods.
//! Descriptors only describe what the type itself declares; inherited members
//! are resolved later by walking the superclass chain.
//!
//! Field slots and superclass links are stored as *projections*: typed
//! `fn(&T) -> &V` pairs erased behind [`Project`], so a slot can be reached from
//! a `&dyn Any` without knowing `T` at the call site. Projections are written by
//! the type's owner, which is what lets name-driven access ignore field privacy.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ============================================================================
// Type keys
// ============================================================================

/// Globally unique handle to a Rust type, usable as a cache key.
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`. Interfaces are keyed as `dyn Trait`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full Rust type name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Kind of registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Concrete struct that may extend one superclass
    Class,
    /// `dyn Trait` marker that may extend other interfaces
    Interface,
}

// ============================================================================
// Projections
// ============================================================================

/// Type-erased path from a value to one of its parts.
pub(crate) trait Project: Send + Sync {
    fn project<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any>;
    fn project_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

/// `T -> V` projection built from a pair of plain function pointers.
pub(crate) struct Projection<T, V> {
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T, V> Projection<T, V> {
    pub(crate) fn new(get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self { get, get_mut }
    }
}

impl<T: Any, V: Any> Project for Projection<T, V> {
    fn project<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any> {
        target.downcast_ref::<T>().map(|t| (self.get)(t) as &dyn Any)
    }

    fn project_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        target
            .downcast_mut::<T>()
            .map(|t| (self.get_mut)(t) as &mut dyn Any)
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Superclass link: the parent's key and the projection onto the embedded parent value
#[derive(Clone)]
pub struct Superclass {
    key: TypeKey,
    upcast: Arc<dyn Project>,
}

impl Superclass {
    pub(crate) fn new(key: TypeKey, upcast: Arc<dyn Project>) -> Self {
        Self { key, upcast }
    }

    /// Key of the superclass
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub(crate) fn upcast(&self) -> Arc<dyn Project> {
        Arc::clone(&self.upcast)
    }
}

impl fmt::Debug for Superclass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Superclass").field(&self.key).finish()
    }
}

/// A declared storage slot
#[derive(Clone)]
pub struct FieldDesc {
    name: String,
    value_type: TypeKey,
    slot: Arc<dyn Project>,
}

impl FieldDesc {
    pub(crate) fn new(name: String, value_type: TypeKey, slot: Arc<dyn Project>) -> Self {
        Self {
            name,
            value_type,
            slot,
        }
    }

    /// Declared field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type of the slot
    pub fn value_type(&self) -> TypeKey {
        self.value_type
    }

    pub(crate) fn slot(&self) -> Arc<dyn Project> {
        Arc::clone(&self.slot)
    }
}

impl fmt::Debug for FieldDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDesc")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .finish()
    }
}

/// A declared named operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDesc {
    /// Method name, e.g. `getId`
    pub name: String,
    /// Number of parameters (receiver excluded)
    pub params: usize,
}

/// Zero-argument constructor
pub type Constructor = fn() -> Box<dyn Any + Send>;

/// Registered shape of a single type
#[derive(Debug, Clone)]
pub struct TypeDesc {
    pub(crate) key: TypeKey,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) superclass: Option<Superclass>,
    pub(crate) interfaces: Vec<TypeKey>,
    pub(crate) fields: Vec<FieldDesc>,
    pub(crate) methods: Vec<MethodDesc>,
    pub(crate) constructor: Option<Constructor>,
}

impl TypeDesc {
    /// Key of the described type
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Display name given at registration
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Immediate superclass, `None` for a root type
    pub fn superclass(&self) -> Option<&Superclass> {
        self.superclass.as_ref()
    }

    /// Directly declared interfaces (for an interface: its parent interfaces)
    pub fn interfaces(&self) -> &[TypeKey] {
        &self.interfaces
    }

    /// Fields declared by this type only
    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    /// Methods declared by this type only
    pub fn methods(&self) -> &[MethodDesc] {
        &self.methods
    }

    /// Zero-argument constructor, if registered
    pub fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }
}
