//! Name-driven value access
//!
//! Reads and writes go through the property-field index of the instance's
//! runtime type. Slot projections come from the type's registration, so field
//! visibility is never consulted.

use std::any::Any;

use crate::descriptor::TypeKey;
use crate::error::{ReflectError, ReflectResult};
use crate::field::FieldEntry;
use crate::Reflector;

impl Reflector {
    /// Registered key of the instance's concrete type
    pub fn key_of(&self, instance: &dyn Any) -> ReflectResult<TypeKey> {
        let id = (*instance).type_id();
        self.registry
            .key_of(id)
            .ok_or_else(|| ReflectError::UnregisteredType {
                name: format!("{:?}", id),
            })
    }

    /// Property field `name` of the instance's type
    pub fn resolve(&self, instance: &dyn Any, name: &str) -> ReflectResult<FieldEntry> {
        let ty = self.key_of(instance)?;
        self.field(ty, name)
    }

    /// Clone the value of field `name`
    pub fn read<V: Any + Clone>(&self, instance: &dyn Any, name: &str) -> ReflectResult<V> {
        self.resolve(instance, name)?.get(instance)
    }

    /// Borrow the value of field `name`
    pub fn read_ref<'a, V: Any>(&self, instance: &'a dyn Any, name: &str) -> ReflectResult<&'a V> {
        self.resolve(instance, name)?.get_ref(instance)
    }

    /// Mutably borrow the value of field `name`
    pub fn read_mut<'a, V: Any>(
        &self,
        instance: &'a mut dyn Any,
        name: &str,
    ) -> ReflectResult<&'a mut V> {
        let entry = self.resolve(&*instance, name)?;
        entry.get_mut(instance)
    }

    /// Store `value` into field `name`, returning the previous value
    pub fn write<V: Any>(&self, instance: &mut dyn Any, name: &str, value: V) -> ReflectResult<V> {
        let entry = self.resolve(&*instance, name)?;
        entry.set(instance, value)
    }

    /// Clone the value of a pre-resolved field
    pub fn read_entry<V: Any + Clone>(
        &self,
        instance: &dyn Any,
        entry: &FieldEntry,
    ) -> ReflectResult<V> {
        entry.get(instance)
    }

    /// Borrow the value of a pre-resolved field
    pub fn read_ref_entry<'a, V: Any>(
        &self,
        instance: &'a dyn Any,
        entry: &FieldEntry,
    ) -> ReflectResult<&'a V> {
        entry.get_ref(instance)
    }

    /// Mutably borrow the value of a pre-resolved field
    pub fn read_mut_entry<'a, V: Any>(
        &self,
        instance: &'a mut dyn Any,
        entry: &FieldEntry,
    ) -> ReflectResult<&'a mut V> {
        entry.get_mut(instance)
    }

    /// Store `value` into a pre-resolved field, returning the previous value
    pub fn write_entry<V: Any>(
        &self,
        instance: &mut dyn Any,
        entry: &FieldEntry,
        value: V,
    ) -> ReflectResult<V> {
        entry.set(instance, value)
    }
}
