//! Tree assembly
//!
//! Nodes arrive as an owned flat list. Assembly indexes them by position,
//! links every node under its parent's position, walks breadth-first from the
//! roots, and then moves nodes into their parents' children collections in
//! reverse visit order so each subtree is complete before it is moved. Every
//! node is moved at most once, so no node can end up under two parents and a
//! parent cycle can never be materialised.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use beanwalk_reflect::{Reflector, TypeKey};
use rustc_hash::FxHashMap;

use crate::config::{DuplicatePolicy, OrphanPolicy, TreeFields, TreeOptions};
use crate::error::{TreeError, TreeResult};
use crate::slots::{read_key, ChildrenSlot};
use crate::sorter::TreeSorter;

/// Builds trees out of flat node lists of one registered type
pub struct TreeBuilder<'r, K> {
    reflector: &'r Reflector,
    fields: TreeFields,
    options: TreeOptions<K>,
}

/// Parent/child links by input position
struct Links {
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
    /// Dropped orphans
    orphans: Vec<usize>,
}

/// Breadth-first result of [`TreeBuilder::visit_order`]
struct Visit {
    /// Positions reachable from a root
    order: Vec<usize>,
    /// Dropped orphans and their descendants
    orphaned: usize,
    /// Nodes on or under a parent cycle
    cyclic: usize,
}

impl<'r, K> TreeBuilder<'r, K>
where
    K: Any + Clone + Eq + Hash + Debug + Default,
{
    /// Builder with default options, so `K::default()` marks a root
    pub fn new(reflector: &'r Reflector, fields: TreeFields) -> Self {
        Self::with_config(reflector, fields, TreeOptions::default())
    }
}

impl<'r, K> TreeBuilder<'r, K>
where
    K: Any + Clone + Eq + Hash + Debug,
{
    /// Builder with explicit options, for key types without a `Default`
    pub fn with_config(
        reflector: &'r Reflector,
        fields: TreeFields,
        options: TreeOptions<K>,
    ) -> Self {
        Self {
            reflector,
            fields,
            options,
        }
    }

    /// Replace the assembly options
    pub fn with_options(mut self, options: TreeOptions<K>) -> Self {
        self.options = options;
        self
    }

    /// Field names in use
    pub fn fields(&self) -> &TreeFields {
        &self.fields
    }

    /// Options in use
    pub fn options(&self) -> &TreeOptions<K> {
        &self.options
    }

    /// Assemble `nodes` into a forest. Roots keep their input order, and so do
    /// the children of every node.
    pub fn assemble<T: Any>(&self, nodes: Vec<T>) -> TreeResult<Vec<T>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let ty = TypeKey::of::<T>();
        let id_entry = self.reflector.field(ty, &self.fields.id)?;
        let parent_entry = self.reflector.field(ty, &self.fields.parent_id)?;
        let children = ChildrenSlot::resolve::<T>(self.reflector.field(ty, &self.fields.children)?)?;

        let mut ids = Vec::with_capacity(nodes.len());
        let mut parents = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let id = read_key::<K>(self.reflector, node, &id_entry)?
                .ok_or(TreeError::MissingId { index })?;
            ids.push(id);
            parents.push(read_key::<K>(self.reflector, node, &parent_entry)?);
        }

        let positions = self.index_ids(&ids)?;
        let links = self.link(&ids, &parents, &positions)?;
        let Visit {
            order,
            orphaned,
            cyclic,
        } = self.visit_order(&ids, &links)?;

        let mut slots: Vec<Option<T>> = nodes.into_iter().map(Some).collect();
        for &index in order.iter().rev() {
            let kids = &links.children[index];
            if kids.is_empty() {
                continue;
            }
            let moved: Vec<T> = kids.iter().filter_map(|&kid| slots[kid].take()).collect();
            if let Some(parent) = slots[index].as_mut() {
                children.attach(self.reflector, parent, moved)?;
            }
        }

        let forest: Vec<T> = links
            .roots
            .iter()
            .filter_map(|&root| slots[root].take())
            .collect();

        tracing::debug!(
            node_type = ty.name(),
            nodes = ids.len(),
            attached = order.len(),
            orphaned,
            cyclic,
            roots = forest.len(),
            "assembled tree"
        );
        Ok(forest)
    }

    /// Assemble, then order every sibling list (roots included) by the order field
    pub fn assemble_sorted<T: Any, S: Any + PartialOrd>(&self, nodes: Vec<T>) -> TreeResult<Vec<T>> {
        let mut forest = self.assemble(nodes)?;
        TreeSorter::new(self.reflector, &self.fields.children, &self.fields.order)
            .sort_forest::<T, S>(&mut forest)?;
        Ok(forest)
    }

    /// Assemble and return the only root, failing unless there is exactly one
    pub fn assemble_single<T: Any>(&self, nodes: Vec<T>) -> TreeResult<T> {
        single_root(self.assemble(nodes)?)
    }

    /// [`assemble_single`](Self::assemble_single) with sorted children
    pub fn assemble_single_sorted<T: Any, S: Any + PartialOrd>(
        &self,
        nodes: Vec<T>,
    ) -> TreeResult<T> {
        single_root(self.assemble_sorted::<T, S>(nodes)?)
    }

    /// id -> position
    fn index_ids(&self, ids: &[K]) -> TreeResult<FxHashMap<K, usize>> {
        let mut positions = FxHashMap::with_capacity_and_hasher(ids.len(), Default::default());
        for (index, id) in ids.iter().enumerate() {
            match positions.entry(id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(mut slot) => match self.options.duplicate_ids {
                    DuplicatePolicy::Reject => {
                        return Err(TreeError::DuplicateId {
                            id: format!("{:?}", id),
                            first: *slot.get(),
                            second: index,
                        });
                    }
                    DuplicatePolicy::LastWins => {
                        tracing::warn!(id = ?id, first = *slot.get(), second = index, "duplicate node id, later node wins");
                        slot.insert(index);
                    }
                },
            }
        }
        Ok(positions)
    }

    fn link(
        &self,
        ids: &[K],
        parents: &[Option<K>],
        positions: &FxHashMap<K, usize>,
    ) -> TreeResult<Links> {
        let mut links = Links {
            roots: Vec::new(),
            children: vec![Vec::new(); ids.len()],
            orphans: Vec::new(),
        };

        for (index, parent) in parents.iter().enumerate() {
            if self.options.is_root_parent(parent.as_ref()) {
                links.roots.push(index);
                continue;
            }
            let Some(parent) = parent else {
                continue;
            };
            match positions.get(parent) {
                Some(&position) => links.children[position].push(index),
                None => match self.options.orphans {
                    OrphanPolicy::Drop => {
                        tracing::warn!(id = ?ids[index], parent = ?parent, "dropping orphan node");
                        links.orphans.push(index);
                    }
                    OrphanPolicy::Reject => {
                        return Err(TreeError::OrphanNode {
                            id: format!("{:?}", ids[index]),
                            parent: format!("{:?}", parent),
                        });
                    }
                    OrphanPolicy::PromoteToRoot => {
                        tracing::debug!(id = ?ids[index], parent = ?parent, "promoting orphan node to root");
                        links.roots.push(index);
                    }
                },
            }
        }
        Ok(links)
    }

    /// Breadth-first positions reachable from the roots, with the rest split
    /// into orphan subtrees and cycles
    fn visit_order(&self, ids: &[K], links: &Links) -> TreeResult<Visit> {
        let mut reached = vec![false; ids.len()];
        let order = walk(&links.roots, links, &mut reached);
        let orphaned = walk(&links.orphans, links, &mut reached).len();
        let cyclic = ids.len() - order.len() - orphaned;

        if orphaned > links.orphans.len() {
            tracing::warn!(
                descendants = orphaned - links.orphans.len(),
                "dropping descendants of orphan nodes"
            );
        }
        if cyclic > 0 {
            if self.options.orphans == OrphanPolicy::Reject {
                if let Some(index) = reached.iter().position(|seen| !seen) {
                    return Err(TreeError::Unreachable {
                        id: format!("{:?}", ids[index]),
                    });
                }
            }
            tracing::warn!(
                unreachable = cyclic,
                "dropping nodes whose parent chain never reaches a root"
            );
        }
        Ok(Visit {
            order,
            orphaned,
            cyclic,
        })
    }
}

/// Breadth-first walk from `starts` over nodes not yet `reached`
fn walk(starts: &[usize], links: &Links, reached: &mut [bool]) -> Vec<usize> {
    let mut order = Vec::new();
    let mut queue = VecDeque::with_capacity(starts.len());
    for &start in starts {
        if !reached[start] {
            reached[start] = true;
            queue.push_back(start);
        }
    }

    while let Some(index) = queue.pop_front() {
        order.push(index);
        for &kid in &links.children[index] {
            if !reached[kid] {
                reached[kid] = true;
                queue.push_back(kid);
            }
        }
    }
    order
}

fn single_root<T>(mut forest: Vec<T>) -> TreeResult<T> {
    match forest.len() {
        1 => forest.pop().ok_or(TreeError::RootCount { found: 0 }),
        found => Err(TreeError::RootCount { found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanwalk_reflect::TypeBuilder;

    #[derive(Debug, Default)]
    struct Dept {
        id: u32,
        parent_id: Option<u32>,
        children: Vec<Dept>,
    }

    fn dept(id: u32, parent_id: Option<u32>) -> Dept {
        Dept {
            id,
            parent_id,
            children: Vec::new(),
        }
    }

    fn reflector() -> Reflector {
        let reflector = Reflector::new();
        reflector
            .register(
                TypeBuilder::<Dept>::class("Dept")
                    .property::<u32>("id", |d| &d.id, |d| &mut d.id)
                    .property::<Option<u32>>("parentId", |d| &d.parent_id, |d| &mut d.parent_id)
                    .property::<Vec<Dept>>("children", |d| &d.children, |d| &mut d.children)
                    .build(),
            )
            .unwrap();
        reflector
    }

    fn ids(nodes: &[Dept]) -> Vec<u32> {
        nodes.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_assemble_keeps_input_order() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());

        let forest = builder
            .assemble(vec![
                dept(3, Some(1)),
                dept(1, None),
                dept(2, Some(1)),
                dept(4, Some(3)),
                dept(9, None),
            ])
            .unwrap();

        assert_eq!(ids(&forest), vec![1, 9]);
        assert_eq!(ids(&forest[0].children), vec![3, 2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![4]);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());
        assert!(builder.assemble(Vec::<Dept>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_name() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::new("id", "parent", "children"));
        let err = builder.assemble(vec![dept(1, None)]).unwrap_err();
        assert!(matches!(err, TreeError::Reflect(_)));
    }

    #[test]
    fn test_self_parent_is_dropped() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());

        let forest = builder.assemble(vec![dept(1, None), dept(2, Some(2))]).unwrap();
        assert_eq!(ids(&forest), vec![1]);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_cycle_rejected_under_reject() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default())
            .with_options(TreeOptions::new().with_orphans(OrphanPolicy::Reject));

        let err = builder
            .assemble(vec![dept(1, None), dept(2, Some(3)), dept(3, Some(2))])
            .unwrap_err();
        assert_eq!(err, TreeError::Unreachable { id: "2".to_string() });
    }

    fn visit(builder: &TreeBuilder<'_, u32>, nodes: &[Dept]) -> Visit {
        let ids: Vec<u32> = nodes.iter().map(|d| d.id).collect();
        let parents: Vec<Option<u32>> = nodes.iter().map(|d| d.parent_id).collect();
        let positions = builder.index_ids(&ids).unwrap();
        let links = builder.link(&ids, &parents, &positions).unwrap();
        builder.visit_order(&ids, &links).unwrap()
    }

    #[test]
    fn test_orphan_subtree_is_not_counted_as_cycle() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());

        let visit = visit(&builder, &[dept(1, None), dept(9, Some(42)), dept(10, Some(9))]);
        assert_eq!(visit.order, vec![0]);
        assert_eq!(visit.orphaned, 2);
        assert_eq!(visit.cyclic, 0);
    }

    #[test]
    fn test_cycle_counted_apart_from_orphans() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());

        let visit = visit(
            &builder,
            &[dept(1, None), dept(2, Some(3)), dept(3, Some(2)), dept(9, Some(42))],
        );
        assert_eq!(visit.order, vec![0]);
        assert_eq!(visit.orphaned, 1);
        assert_eq!(visit.cyclic, 2);
    }

    #[test]
    fn test_zero_parent_is_root_by_default() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());

        let forest = builder.assemble(vec![dept(1, Some(0)), dept(2, Some(1))]).unwrap();
        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![2]);

        let strict = TreeBuilder::<u32>::with_config(
            &reflector,
            TreeFields::default(),
            TreeOptions::new().without_root_sentinel(),
        );
        let forest = strict.assemble(vec![dept(1, Some(0)), dept(2, Some(1))]).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_single_root() {
        let reflector = reflector();
        let builder = TreeBuilder::<u32>::new(&reflector, TreeFields::default());

        let root = builder
            .assemble_single(vec![dept(2, Some(1)), dept(1, None)])
            .unwrap();
        assert_eq!(root.id, 1);
        assert_eq!(ids(&root.children), vec![2]);

        let err = builder
            .assemble_single(vec![dept(1, None), dept(2, None)])
            .unwrap_err();
        assert_eq!(err, TreeError::RootCount { found: 2 });

        let err = builder.assemble_single(vec![dept(2, Some(1))]).unwrap_err();
        assert_eq!(err, TreeError::RootCount { found: 0 });
    }
}
