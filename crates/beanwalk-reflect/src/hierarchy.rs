//! Type hierarchy resolution
//!
//! `ancestors` follows superclass links upward and stops at a type with no
//! superclass, so neither the type itself nor an implicit universal root ever
//! appears in the chain. `interfaces` collects the transitive closure of
//! declared interfaces; only interfaces declared by the type itself (and their
//! parents) are included, not those of its superclasses.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::cache::{AncestorChain, InterfaceClosure};
use crate::descriptor::{Project, TypeDesc, TypeKey};
use crate::error::{ReflectError, ReflectResult};
use crate::Reflector;

/// One type in a lineage walk, with the upcasts leading to it from the walked type
pub(crate) struct Level {
    pub(crate) desc: Arc<TypeDesc>,
    pub(crate) upcasts: Arc<[Arc<dyn Project>]>,
}

impl Reflector {
    /// Superclasses of `ty`, immediate superclass first.
    ///
    /// `None` resolves to an empty chain.
    pub fn ancestors(&self, ty: impl Into<Option<TypeKey>>) -> ReflectResult<Arc<AncestorChain>> {
        let Some(ty) = ty.into() else {
            return Ok(Arc::default());
        };

        self.cache.ancestors.get_or_try_insert(ty, || {
            let mut chain = AncestorChain::new();
            let mut current = self.registry.require(ty)?;
            while let Some(superclass) = current.superclass() {
                let key = superclass.key();
                if key == ty || chain.contains(&key) {
                    return Err(ReflectError::CyclicHierarchy {
                        name: key.name().to_string(),
                    });
                }
                chain.push(key);
                current = self.registry.require(key)?;
            }
            Ok(chain)
        })
    }

    /// Every interface reachable from the interfaces `ty` declares
    pub fn interfaces(&self, ty: TypeKey) -> ReflectResult<Arc<InterfaceClosure>> {
        self.cache.interfaces.get_or_try_insert(ty, || {
            let mut closure = InterfaceClosure::default();
            let mut pending = self.registry.require(ty)?.interfaces().to_vec();
            while let Some(iface) = pending.pop() {
                if closure.insert(iface) {
                    pending.extend_from_slice(self.registry.require(iface)?.interfaces());
                }
            }
            Ok(closure)
        })
    }

    /// True when `sub` is `sup`, extends it, or implements it (directly, through a
    /// parent interface, or through a superclass)
    pub fn is_subclass_of(&self, sub: TypeKey, sup: TypeKey) -> ReflectResult<bool> {
        if sub == sup {
            return Ok(true);
        }

        let ancestors = self.ancestors(sub)?;
        if ancestors.contains(&sup) {
            return Ok(true);
        }

        let mut seen = FxHashSet::default();
        for key in std::iter::once(sub).chain(ancestors.iter().copied()) {
            if seen.insert(key) && self.interfaces(key)?.contains(&sup) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// `ty` and its ancestors, most-base first and `ty` last.
    ///
    /// Indices that insert entries level by level walk in this order, so a
    /// declaration on a derived type replaces a same-named one on a base type.
    pub(crate) fn lineage(&self, ty: TypeKey) -> ReflectResult<Vec<Level>> {
        let chain = self.ancestors(ty)?;
        let mut levels = Vec::with_capacity(chain.len() + 1);
        let mut upcasts: Vec<Arc<dyn Project>> = Vec::new();

        let mut desc = self.registry.require(ty)?;
        for key in chain.iter().copied() {
            levels.push(Level {
                desc: Arc::clone(&desc),
                upcasts: Arc::from(upcasts.as_slice()),
            });
            if let Some(superclass) = desc.superclass() {
                upcasts.push(superclass.upcast());
            }
            desc = self.registry.require(key)?;
        }
        levels.push(Level {
            desc,
            upcasts: Arc::from(upcasts.as_slice()),
        });

        levels.reverse();
        Ok(levels)
    }
}
