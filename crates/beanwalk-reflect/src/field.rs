//! Field index
//!
//! A *property field* is a declared slot whose name matches both a getter- and a
//! setter-derived property name somewhere in the type's lineage. Incidental
//! state without an accessor pair is left out, and so is the serialization
//! version marker.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::cache::{AccessorMap, FieldMap};
use crate::descriptor::{Project, TypeKey};
use crate::error::{ReflectError, ReflectResult};
use crate::hierarchy::Level;
use crate::Reflector;

/// Reserved field name that is never treated as a property
pub const SERIAL_VERSION_MARKER: &str = "serialVersionUID";

/// A field resolved for one concrete type.
///
/// The entry carries the upcasts from its owner type to the declaring type, so
/// an inherited field is reached through the embedded parent value.
#[derive(Clone)]
pub struct FieldEntry {
    name: Arc<str>,
    owner: TypeKey,
    declaring_type: TypeKey,
    value_type: TypeKey,
    upcasts: Arc<[Arc<dyn Project>]>,
    slot: Arc<dyn Project>,
}

impl FieldEntry {
    /// Declared field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type the entry was resolved for; instances passed in must be of this type
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    /// Type in the lineage that declares the slot
    pub fn declaring_type(&self) -> TypeKey {
        self.declaring_type
    }

    /// Declared value type of the slot
    pub fn value_type(&self) -> TypeKey {
        self.value_type
    }

    /// True when the slot holds exactly `V`
    pub fn holds<V: Any>(&self) -> bool {
        self.value_type == TypeKey::of::<V>()
    }

    fn locate<'a>(&self, instance: &'a dyn Any) -> ReflectResult<&'a dyn Any> {
        if (*instance).type_id() != self.owner.id() {
            return Err(self.foreign());
        }
        let mut target = instance;
        for hop in self.upcasts.iter() {
            target = hop.project(target).ok_or_else(|| self.foreign())?;
        }
        self.slot.project(target).ok_or_else(|| self.foreign())
    }

    fn locate_mut<'a>(&self, instance: &'a mut dyn Any) -> ReflectResult<&'a mut dyn Any> {
        if (*instance).type_id() != self.owner.id() {
            return Err(self.foreign());
        }
        let mut target = instance;
        for hop in self.upcasts.iter() {
            target = hop.project_mut(target).ok_or_else(|| self.foreign())?;
        }
        self.slot.project_mut(target).ok_or_else(|| self.foreign())
    }

    /// Borrow the slot's value
    pub fn get_ref<'a, V: Any>(&self, instance: &'a dyn Any) -> ReflectResult<&'a V> {
        self.locate(instance)?
            .downcast_ref::<V>()
            .ok_or_else(|| self.mismatch::<V>())
    }

    /// Mutably borrow the slot's value
    pub fn get_mut<'a, V: Any>(&self, instance: &'a mut dyn Any) -> ReflectResult<&'a mut V> {
        self.locate_mut(instance)?
            .downcast_mut::<V>()
            .ok_or_else(|| self.mismatch::<V>())
    }

    /// Clone the slot's value
    pub fn get<V: Any + Clone>(&self, instance: &dyn Any) -> ReflectResult<V> {
        self.get_ref::<V>(instance).cloned()
    }

    /// Replace the slot's value, returning the previous one
    pub fn set<V: Any>(&self, instance: &mut dyn Any, value: V) -> ReflectResult<V> {
        Ok(std::mem::replace(self.get_mut::<V>(instance)?, value))
    }

    fn mismatch<V: Any>(&self) -> ReflectError {
        ReflectError::type_mismatch(&self.name, self.value_type.name(), std::any::type_name::<V>())
    }

    fn foreign(&self) -> ReflectError {
        ReflectError::ForeignInstance {
            field: self.name.to_string(),
            owner: self.owner.name().to_string(),
        }
    }
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("declaring_type", &self.declaring_type)
            .field("value_type", &self.value_type)
            .finish()
    }
}

fn property_names(accessors: &AccessorMap) -> FxHashSet<&str> {
    accessors.values().map(|entry| entry.property.as_str()).collect()
}

impl Reflector {
    /// Property fields of `ty` (slots with a matching getter and setter), keyed by name.
    ///
    /// `None` resolves to an empty map. When two levels declare the same name,
    /// the most derived declaration is kept.
    pub fn fields(&self, ty: impl Into<Option<TypeKey>>) -> ReflectResult<Arc<FieldMap>> {
        let Some(ty) = ty.into() else {
            return Ok(Arc::default());
        };

        self.cache.fields.get_or_try_insert(ty, || {
            let getters = self.getters(ty)?;
            let setters = self.setters(ty)?;
            let readable = property_names(&getters);
            let writable = property_names(&setters);

            let mut index = FieldMap::default();
            for entry in self.walk_fields(ty)? {
                if readable.contains(entry.name()) && writable.contains(entry.name()) {
                    index.insert(entry.name().to_string(), entry);
                }
            }
            Ok(index)
        })
    }

    /// Every declared slot of `ty` and its ancestors, base first, with no
    /// accessor filtering. Only the serialization marker is skipped.
    pub fn declared_fields(&self, ty: TypeKey) -> ReflectResult<Arc<Vec<FieldEntry>>> {
        self.cache
            .declared_fields
            .get_or_try_insert(ty, || self.walk_fields(ty))
    }

    /// Resolve one property field, failing with `FieldNotFound`
    pub fn field(&self, ty: TypeKey, name: &str) -> ReflectResult<FieldEntry> {
        self.fields(ty)?
            .get(name)
            .cloned()
            .ok_or_else(|| ReflectError::FieldNotFound {
                type_name: ty.name().to_string(),
                field: name.to_string(),
            })
    }

    fn walk_fields(&self, ty: TypeKey) -> ReflectResult<Vec<FieldEntry>> {
        let mut entries = Vec::new();
        for Level { desc, upcasts } in self.lineage(ty)? {
            for field in desc.fields() {
                if field.name() == SERIAL_VERSION_MARKER {
                    continue;
                }
                entries.push(FieldEntry {
                    name: Arc::from(field.name()),
                    owner: ty,
                    declaring_type: desc.key(),
                    value_type: field.value_type(),
                    upcasts: Arc::clone(&upcasts),
                    slot: field.slot(),
                });
            }
        }
        Ok(entries)
    }
}
