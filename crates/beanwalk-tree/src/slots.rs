//! Typed views over the node fields a tree operation touches
//!
//! Key slots may hold `K` or `Option<K>`; children slots may hold `Vec<T>` or
//! `Option<Vec<T>>`. The shape is decided once per operation from the slot's
//! registered value type.

use std::any::Any;

use beanwalk_reflect::{FieldEntry, ReflectError, Reflector};

use crate::error::TreeResult;

/// Read a key slot holding either `K` or `Option<K>`
pub(crate) fn read_key<K: Any + Clone>(
    reflector: &Reflector,
    node: &dyn Any,
    entry: &FieldEntry,
) -> TreeResult<Option<K>> {
    if entry.holds::<Option<K>>() {
        Ok(reflector.read_entry::<Option<K>>(node, entry)?)
    } else {
        Ok(Some(reflector.read_entry::<K>(node, entry)?))
    }
}

/// Storage shape of a children slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildrenShape {
    /// `Vec<T>`
    Plain,
    /// `Option<Vec<T>>`, allocated on the first attached child
    Optional,
}

/// Resolved children slot of node type `T`
pub(crate) struct ChildrenSlot {
    entry: FieldEntry,
    shape: ChildrenShape,
}

impl ChildrenSlot {
    pub(crate) fn resolve<T: Any>(entry: FieldEntry) -> TreeResult<Self> {
        let shape = if entry.holds::<Vec<T>>() {
            ChildrenShape::Plain
        } else if entry.holds::<Option<Vec<T>>>() {
            ChildrenShape::Optional
        } else {
            return Err(ReflectError::type_mismatch(
                entry.name(),
                entry.value_type().name(),
                std::any::type_name::<Vec<T>>(),
            )
            .into());
        };
        Ok(Self { entry, shape })
    }

    #[cfg(test)]
    pub(crate) fn shape(&self) -> ChildrenShape {
        self.shape
    }

    /// The node's children, `None` while an optional slot is unallocated
    pub(crate) fn children_mut<'a, T: Any>(
        &self,
        reflector: &Reflector,
        node: &'a mut T,
    ) -> TreeResult<Option<&'a mut Vec<T>>> {
        match self.shape {
            ChildrenShape::Plain => Ok(Some(
                reflector.read_mut_entry::<Vec<T>>(node, &self.entry)?,
            )),
            ChildrenShape::Optional => Ok(reflector
                .read_mut_entry::<Option<Vec<T>>>(node, &self.entry)?
                .as_mut()),
        }
    }

    /// Append `children` to the node's collection, allocating it if needed
    pub(crate) fn attach<T: Any>(
        &self,
        reflector: &Reflector,
        node: &mut T,
        children: Vec<T>,
    ) -> TreeResult<()> {
        if children.is_empty() {
            return Ok(());
        }
        match self.shape {
            ChildrenShape::Plain => {
                reflector
                    .read_mut_entry::<Vec<T>>(node, &self.entry)?
                    .extend(children);
            }
            ChildrenShape::Optional => {
                reflector
                    .read_mut_entry::<Option<Vec<T>>>(node, &self.entry)?
                    .get_or_insert_with(Vec::new)
                    .extend(children);
            }
        }
        Ok(())
    }
}
