//! Metadata cache
//!
//! One memo table per derived view (ancestors, interfaces, getters, setters,
//! property fields, declared fields). Tables are write-once per key: a miss
//! computes the value outside any lock, then publishes it with
//! `entry().or_insert`. Two threads racing on the same miss both compute, but
//! only the first published `Arc` is ever handed out, so readers never see a
//! partial value and repeated lookups return the same allocation.
//!
//! Entries are never evicted. The cache lives as long as its
//! [`Reflector`](crate::Reflector).

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::accessor::AccessorEntry;
use crate::descriptor::TypeKey;
use crate::error::ReflectResult;
use crate::field::FieldEntry;

/// Ancestor chain, immediate superclass first
pub type AncestorChain = Vec<TypeKey>;

/// Transitive set of implemented interfaces
pub type InterfaceClosure = FxHashSet<TypeKey>;

/// Accessor name -> entry
pub type AccessorMap = FxHashMap<String, AccessorEntry>;

/// Field name -> property field entry
pub type FieldMap = FxHashMap<String, FieldEntry>;

/// Write-once memo table keyed by type
pub(crate) struct MemoTable<V> {
    label: &'static str,
    entries: DashMap<TypeKey, Arc<V>, FxBuildHasher>,
}

impl<V> MemoTable<V> {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: DashMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Cached value for `key`, computing and publishing it on a miss.
    ///
    /// `compute` must not be holding a guard into this table; it may freely
    /// query other tables (or this one for other keys).
    pub(crate) fn get_or_try_insert<F>(&self, key: TypeKey, compute: F) -> ReflectResult<Arc<V>>
    where
        F: FnOnce() -> ReflectResult<V>,
    {
        if let Some(hit) = self.entries.get(&key) {
            tracing::trace!(table = self.label, type_name = key.name(), "metadata cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let computed = Arc::new(compute()?);
        tracing::debug!(table = self.label, type_name = key.name(), "metadata cache miss resolved");

        let published = self.entries.entry(key).or_insert(computed);
        Ok(Arc::clone(published.value()))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Number of cached entries per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CacheStats {
    pub ancestors: usize,
    pub interfaces: usize,
    pub getters: usize,
    pub setters: usize,
    pub fields: usize,
    pub declared_fields: usize,
}

/// Per-type metadata caches
pub struct MetadataCache {
    pub(crate) ancestors: MemoTable<AncestorChain>,
    pub(crate) interfaces: MemoTable<InterfaceClosure>,
    pub(crate) getters: MemoTable<AccessorMap>,
    pub(crate) setters: MemoTable<AccessorMap>,
    pub(crate) fields: MemoTable<FieldMap>,
    pub(crate) declared_fields: MemoTable<Vec<FieldEntry>>,
}

impl MetadataCache {
    /// Create empty caches
    pub fn new() -> Self {
        Self {
            ancestors: MemoTable::new("ancestors"),
            interfaces: MemoTable::new("interfaces"),
            getters: MemoTable::new("getters"),
            setters: MemoTable::new("setters"),
            fields: MemoTable::new("fields"),
            declared_fields: MemoTable::new("declared_fields"),
        }
    }

    /// Snapshot of table sizes
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            ancestors: self.ancestors.len(),
            interfaces: self.interfaces.len(),
            getters: self.getters.len(),
            setters: self.setters.len(),
            fields: self.fields.len(),
            declared_fields: self.declared_fields.len(),
        }
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReflectError;
    use std::cell::Cell;

    struct Marker;

    #[test]
    fn test_memo_computes_once() {
        let table: MemoTable<Vec<u32>> = MemoTable::new("test");
        let calls = Cell::new(0);
        let key = TypeKey::of::<Marker>();

        let first = table
            .get_or_try_insert(key, || {
                calls.set(calls.get() + 1);
                Ok(vec![1, 2, 3])
            })
            .unwrap();
        let second = table
            .get_or_try_insert(key, || {
                calls.set(calls.get() + 1);
                Ok(vec![9])
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, vec![1, 2, 3]);
    }

    #[test]
    fn test_memo_failure_not_cached() {
        let table: MemoTable<Vec<u32>> = MemoTable::new("test");
        let key = TypeKey::of::<Marker>();

        let err = table.get_or_try_insert(key, || {
            Err(ReflectError::UnregisteredType {
                name: "Marker".to_string(),
            })
        });
        assert!(err.is_err());
        assert_eq!(table.len(), 0);

        let ok = table.get_or_try_insert(key, || Ok(vec![7])).unwrap();
        assert_eq!(*ok, vec![7]);
    }

    #[test]
    fn test_stats_start_empty() {
        assert_eq!(MetadataCache::new().stats(), CacheStats::default());
    }
}
