//! Type builder
//!
//! Fluent construction of [`TypeDesc`] values. A class builder knows its
//! concrete `T`, so field and superclass projections are checked by the
//! compiler at registration time:
//!
//! ```ignore
//! let desc = TypeBuilder::<Sub>::class("Sub")
//!     .extends::<Parent>(|s| &s.base, |s| &mut s.base)
//!     .implements::<dyn Named>()
//!     .property::<String>("name", |s| &s.name, |s| &mut s.name)
//!     .default_constructor()
//!     .build();
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::descriptor::{FieldDesc, MethodDesc, Projection, Superclass, TypeDesc, TypeKey, TypeKind};

/// Builder for a [`TypeDesc`] describing `T`
pub struct TypeBuilder<T: ?Sized + 'static> {
    desc: TypeDesc,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized + 'static> TypeBuilder<T> {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            desc: TypeDesc {
                key: TypeKey::of::<T>(),
                name: name.into(),
                kind,
                superclass: None,
                interfaces: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                constructor: None,
            },
            _marker: PhantomData,
        }
    }

    /// Start describing an interface. `T` is normally `dyn Trait`.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    /// Declare a directly implemented interface (or, on an interface, a parent interface)
    pub fn implements<I: ?Sized + 'static>(mut self) -> Self {
        let key = TypeKey::of::<I>();
        if !self.desc.interfaces.contains(&key) {
            self.desc.interfaces.push(key);
        }
        self
    }

    /// Declare a named operation with `params` parameters
    pub fn method(mut self, name: impl Into<String>, params: usize) -> Self {
        self.desc.methods.push(MethodDesc {
            name: name.into(),
            params,
        });
        self
    }

    /// Declare `get<Property>()`
    pub fn getter(self, property: &str) -> Self {
        self.method(accessor_name("get", property), 0)
    }

    /// Declare `is<Property>()`
    pub fn bool_getter(self, property: &str) -> Self {
        self.method(accessor_name("is", property), 0)
    }

    /// Declare `set<Property>(value)`
    pub fn setter(self, property: &str) -> Self {
        self.method(accessor_name("set", property), 1)
    }

    /// Finish the descriptor
    pub fn build(self) -> TypeDesc {
        self.desc
    }
}

impl<T: Any> TypeBuilder<T> {
    /// Start describing a concrete type
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    /// Declare the superclass `P`, embedded in `T` and reached through `up`/`up_mut`
    pub fn extends<P: Any>(mut self, up: fn(&T) -> &P, up_mut: fn(&mut T) -> &mut P) -> Self {
        self.desc.superclass = Some(Superclass::new(
            TypeKey::of::<P>(),
            Arc::new(Projection::new(up, up_mut)),
        ));
        self
    }

    /// Declare a storage slot of type `V`
    pub fn field<V: Any>(
        mut self,
        name: impl Into<String>,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.desc.fields.push(FieldDesc::new(
            name.into(),
            TypeKey::of::<V>(),
            Arc::new(Projection::new(get, get_mut)),
        ));
        self
    }

    /// Declare a slot together with its getter/setter pair.
    ///
    /// `bool` slots get an `is` getter, everything else a `get` getter.
    pub fn property<V: Any>(
        self,
        name: &str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        let with_field = self.field(name, get, get_mut);
        let with_getter = if TypeKey::of::<V>() == TypeKey::of::<bool>() {
            with_field.bool_getter(name)
        } else {
            with_field.getter(name)
        };
        with_getter.setter(name)
    }

    /// Register `T::default` as the zero-argument constructor
    pub fn default_constructor(mut self) -> Self
    where
        T: Default + Send,
    {
        self.desc.constructor = Some(construct_default::<T>);
        self
    }
}

fn construct_default<T: Any + Default + Send>() -> Box<dyn Any + Send> {
    Box::new(T::default())
}

/// `("get", "userName")` -> `"getUserName"`
pub fn accessor_name(prefix: &str, property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => {
            let mut name = String::with_capacity(prefix.len() + property.len());
            name.push_str(prefix);
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
            name
        }
        None => prefix.to_string(),
    }
}
