//! Sibling ordering
//!
//! Every children collection in a subtree is stably sorted by the order field,
//! ascending. Values that do not compare (e.g. `NaN`) are treated as equal.
//! The walk uses an explicit stack, so tree depth is bounded by memory only.

use std::any::Any;
use std::cmp::Ordering;

use beanwalk_reflect::{FieldEntry, ReflectError, Reflector, TypeKey};

use crate::error::TreeResult;
use crate::slots::ChildrenSlot;

/// Sorts children collections by an order field
pub struct TreeSorter<'r> {
    reflector: &'r Reflector,
    children: String,
    order: String,
}

impl<'r> TreeSorter<'r> {
    /// Sorter over the named children and order fields
    pub fn new(
        reflector: &'r Reflector,
        children: impl Into<String>,
        order: impl Into<String>,
    ) -> Self {
        Self {
            reflector,
            children: children.into(),
            order: order.into(),
        }
    }

    /// Sort the children of `node`, then theirs, down to the leaves.
    ///
    /// A node without children is left untouched.
    pub fn sort<T: Any, S: Any + PartialOrd>(&self, node: &mut T) -> TreeResult<()> {
        let (children, order) = self.resolve::<T, S>()?;
        match children.children_mut(self.reflector, node)? {
            Some(kids) => self.sort_levels::<T, S>(kids.as_mut_slice(), &children, &order),
            None => Ok(()),
        }
    }

    /// Sort a list of sibling roots and every subtree below them
    pub fn sort_forest<T: Any, S: Any + PartialOrd>(&self, nodes: &mut [T]) -> TreeResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let (children, order) = self.resolve::<T, S>()?;
        self.sort_levels::<T, S>(nodes, &children, &order)
    }

    fn resolve<T: Any, S: Any>(&self) -> TreeResult<(ChildrenSlot, FieldEntry)> {
        let ty = TypeKey::of::<T>();
        let children = ChildrenSlot::resolve::<T>(self.reflector.field(ty, &self.children)?)?;
        let order = self.reflector.field(ty, &self.order)?;
        if !order.holds::<S>() {
            return Err(ReflectError::type_mismatch(
                order.name(),
                order.value_type().name(),
                std::any::type_name::<S>(),
            )
            .into());
        }
        Ok((children, order))
    }

    fn sort_levels<T: Any, S: Any + PartialOrd>(
        &self,
        top: &mut [T],
        children: &ChildrenSlot,
        order: &FieldEntry,
    ) -> TreeResult<()> {
        let mut pending: Vec<&mut [T]> = vec![top];
        let mut sorted = 0usize;

        while let Some(level) = pending.pop() {
            self.sort_siblings::<T, S>(&mut *level, order)?;
            sorted += 1;
            for node in level {
                if let Some(kids) = children.children_mut(self.reflector, node)? {
                    if !kids.is_empty() {
                        pending.push(kids.as_mut_slice());
                    }
                }
            }
        }

        tracing::trace!(levels = sorted, order = %self.order, "sorted sibling lists");
        Ok(())
    }

    fn sort_siblings<T: Any, S: Any + PartialOrd>(
        &self,
        siblings: &mut [T],
        order: &FieldEntry,
    ) -> TreeResult<()> {
        for node in siblings.iter() {
            self.reflector.read_ref_entry::<S>(node, order)?;
        }

        siblings.sort_by(|a, b| {
            let left = self.reflector.read_ref_entry::<S>(a, order).ok();
            let right = self.reflector.read_ref_entry::<S>(b, order).ok();
            match (left, right) {
                (Some(left), Some(right)) => left.partial_cmp(right).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        });
        Ok(())
    }
}
