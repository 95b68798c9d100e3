//! Tree field names and assembly policies
//!
//! Plain structs with `serde` derives, so a host application can embed them in
//! its own configuration file.

use serde::{Deserialize, Serialize};

/// Logical names of the four node fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeFields {
    /// Node identifier
    pub id: String,
    /// Parent identifier; `None` or the root sentinel marks a root
    pub parent_id: String,
    /// Children collection, `Vec<T>` or `Option<Vec<T>>`
    pub children: String,
    /// Sibling order key, only read when sorting
    pub order: String,
}

impl TreeFields {
    /// Field names for id, parent id and children; order defaults to `"order"`
    pub fn new(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        children: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            children: children.into(),
            ..Self::default()
        }
    }

    /// Use another order field
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }
}

impl Default for TreeFields {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            parent_id: "parentId".to_string(),
            children: "children".to_string(),
            order: "order".to_string(),
        }
    }
}

/// What to do when two nodes share an id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `TreeError::DuplicateId`
    #[default]
    Reject,
    /// Children resolve to the later node; a warning is logged
    LastWins,
}

/// What to do with a node whose parent id matches no node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Leave the node (and its subtree) out of the result; a warning is logged
    #[default]
    Drop,
    /// Fail with `TreeError::OrphanNode` or `TreeError::Unreachable`
    Reject,
    /// Treat the node as an extra root
    PromoteToRoot,
}

/// Assembly options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions<K> {
    /// Parent value that marks a root in addition to `None`.
    ///
    /// Defaults to `K::default()`, so a zero (or empty) parent id is a root.
    pub root_sentinel: Option<K>,
    /// Duplicate id handling
    pub duplicate_ids: DuplicatePolicy,
    /// Orphan handling
    pub orphans: OrphanPolicy,
}

impl<K: Default> TreeOptions<K> {
    /// Defaults: `K::default()` sentinel, reject duplicates, drop orphans
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> TreeOptions<K> {
    /// Treat parents equal to `sentinel` as roots
    pub fn with_root_sentinel(mut self, sentinel: K) -> Self {
        self.root_sentinel = Some(sentinel);
        self
    }

    /// Only a `None` parent marks a root
    pub fn without_root_sentinel(mut self) -> Self {
        self.root_sentinel = None;
        self
    }

    /// Set the duplicate id policy
    pub fn with_duplicate_ids(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_ids = policy;
        self
    }

    /// Set the orphan policy
    pub fn with_orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// True when `parent` marks a root
    pub fn is_root_parent(&self, parent: Option<&K>) -> bool
    where
        K: PartialEq,
    {
        match parent {
            None => true,
            Some(parent) => self.root_sentinel.as_ref() == Some(parent),
        }
    }
}

impl<K: Default> Default for TreeOptions<K> {
    fn default() -> Self {
        Self {
            root_sentinel: Some(K::default()),
            duplicate_ids: DuplicatePolicy::default(),
            orphans: OrphanPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields() {
        let fields = TreeFields::default();
        assert_eq!(fields.id, "id");
        assert_eq!(fields.parent_id, "parentId");
        assert_eq!(fields.children, "children");
        assert_eq!(fields.order, "order");
    }

    #[test]
    fn test_fields_builder() {
        let fields = TreeFields::new("code", "parentCode", "items").with_order("rank");
        assert_eq!(fields.parent_id, "parentCode");
        assert_eq!(fields.order, "rank");
    }

    #[test]
    fn test_default_options() {
        let options: TreeOptions<i64> = TreeOptions::new();
        assert_eq!(options.duplicate_ids, DuplicatePolicy::Reject);
        assert_eq!(options.orphans, OrphanPolicy::Drop);
        assert_eq!(options.root_sentinel, Some(0));
        assert!(options.is_root_parent(None));
        assert!(options.is_root_parent(Some(&0)));
        assert!(!options.is_root_parent(Some(&3)));
    }

    #[test]
    fn test_without_root_sentinel() {
        let options: TreeOptions<i64> = TreeOptions::new().without_root_sentinel();
        assert!(options.is_root_parent(None));
        assert!(!options.is_root_parent(Some(&0)));
    }

    #[test]
    fn test_root_sentinel() {
        let options = TreeOptions::new().with_root_sentinel(-1i64);
        assert!(options.is_root_parent(Some(&-1)));
        assert!(!options.is_root_parent(Some(&0)));
    }
}
