use std::collections::VecDeque;
use std::ops;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};

/// Tree cell stored in the arena.
///
/// Ownership runs strictly downward through `children`; `parent` is a plain
/// index used for upward walks and re-parenting.
#[derive(Debug, Clone)]
pub struct Node<V> {
    /// Payload
    pub value: V,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
    /// 1 for the root, parent's level + 1 otherwise
    pub level: usize,
}

/// Arena storage for all nodes of one tree.
///
/// Callers hand in indices that are known to be live; looking up a removed
/// index is an invariant violation.
#[derive(Debug, Clone)]
pub struct NodeArena<V> {
    arena: Arena<Node<V>>,
}

impl<V> Default for NodeArena<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ops::Index<Index> for NodeArena<V> {
    type Output = Node<V>;

    fn index(&self, idx: Index) -> &Node<V> {
        &self.arena[idx]
    }
}

impl<V> ops::IndexMut<Index> for NodeArena<V> {
    fn index_mut(&mut self, idx: Index) -> &mut Node<V> {
        &mut self.arena[idx]
    }
}

impl<V> NodeArena<V> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// Inserts a parentless node at level 1.
    #[instrument(level = "trace", skip(self, value))]
    pub fn insert_root(&mut self, value: V) -> Index {
        self.arena.insert(Node {
            value,
            parent: None,
            children: Vec::new(),
            level: 1,
        })
    }

    #[instrument(level = "trace", skip(self, value))]
    pub fn add_child(&mut self, parent: Index, value: V) -> Index {
        let level = self.arena[parent].level + 1;
        let child = self.arena.insert(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
            level,
        });
        self.arena[parent].children.push(child);
        child
    }

    pub fn add_children<I>(&mut self, parent: Index, values: I) -> Vec<Index>
    where
        I: IntoIterator<Item = V>,
    {
        values
            .into_iter()
            .map(|value| self.add_child(parent, value))
            .collect()
    }

    /// Appends an already detached node, with its subtree, as the last child of
    /// `parent` and recomputes the levels below it.
    #[instrument(level = "trace", skip(self))]
    pub fn graft(&mut self, parent: Index, child: Index) {
        debug_assert!(self.arena[child].parent.is_none(), "graft of attached node");
        self.arena[child].parent = Some(parent);
        self.arena[parent].children.push(child);
        self.relevel(child);
    }

    /// Unlinks `node` from its parent's child list and returns its former position.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, node: Index) -> Option<usize> {
        let parent = self.arena[node].parent.take()?;
        let siblings = &mut self.arena[parent].children;
        let position = siblings.iter().position(|&c| c == node)?;
        siblings.remove(position);
        Some(position)
    }

    /// Moves `node` below `new_parent`: detach first, then attach and relevel.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, node: Index, new_parent: Index) -> TreeResult<()> {
        if self.is_ancestor_or_self(node, new_parent) {
            return Err(TreeError::Cycle);
        }
        self.detach(node);
        self.graft(new_parent, node);
        Ok(())
    }

    /// Recomputes cached levels of `node` and all of its descendants.
    #[instrument(level = "trace", skip(self))]
    pub fn relevel(&mut self, node: Index) {
        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            let level = match self.arena[idx].parent {
                Some(parent) => self.arena[parent].level + 1,
                None => 1,
            };
            let current = &mut self.arena[idx];
            current.level = level;
            stack.extend(current.children.iter().copied());
        }
    }

    pub fn child_at(&self, node: Index, index: usize) -> TreeResult<Index> {
        let children = &self.arena[node].children;
        children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    pub fn index_of_child(&self, node: Index, child: Index) -> Option<usize> {
        self.arena[node].children.iter().position(|&c| c == child)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn remove_child_at(&mut self, node: Index, index: usize) -> TreeResult<()> {
        let child = self.child_at(node, index)?;
        self.arena[node].children.remove(index);
        self.drop_subtree(child);
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn clear_children(&mut self, node: Index) {
        let children = std::mem::take(&mut self.arena[node].children);
        for child in children {
            self.drop_subtree(child);
        }
    }

    /// Detaches `node` and frees it together with its whole subtree.
    pub fn remove_subtree(&mut self, node: Index) -> usize {
        self.detach(node);
        self.drop_subtree(node)
    }

    /// Removes `node` only; its children take its place in the parent's child
    /// list, keeping their relative order.
    #[instrument(level = "trace", skip(self))]
    pub fn splice_out(&mut self, node: Index) -> Option<V> {
        let parent = self.arena[node].parent?;
        let position = self.detach(node)?;
        let removed = self.arena.remove(node)?;
        for &child in &removed.children {
            self.arena[child].parent = Some(parent);
        }
        self.arena[parent]
            .children
            .splice(position..position, removed.children.iter().copied());
        for &child in &removed.children {
            self.relevel(child);
        }
        Some(removed.value)
    }

    fn drop_subtree(&mut self, node: Index) -> usize {
        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            if let Some(gone) = self.arena.remove(idx) {
                stack.extend(gone.children);
                removed += 1;
            }
        }
        removed
    }

    /// Moves `node` and its subtree out of `source` into this arena, below
    /// `parent` or as a new parentless node. Returns the node's new index.
    #[instrument(level = "trace", skip(self, source))]
    pub fn transplant(
        &mut self,
        source: &mut NodeArena<V>,
        node: Index,
        parent: Option<Index>,
    ) -> Option<Index> {
        source.detach(node);
        let mut moved_root = None;
        let mut queue = VecDeque::from([(node, parent)]);
        while let Some((old, new_parent)) = queue.pop_front() {
            let Some(Node {
                value, children, ..
            }) = source.arena.remove(old)
            else {
                continue;
            };
            let idx = match new_parent {
                Some(p) => self.add_child(p, value),
                None => self.insert_root(value),
            };
            moved_root.get_or_insert(idx);
            queue.extend(children.into_iter().map(|c| (c, Some(idx))));
        }
        moved_root
    }

    /// Breadth-first order: `start`, its children left to right, their children, ...
    pub fn breadth_first(&self, start: Index) -> Vec<Index> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            queue.extend(self.arena[idx].children.iter().copied());
        }
        order
    }

    pub fn ancestors(&self, node: Index) -> impl Iterator<Item = Index> + '_ {
        std::iter::successors(self.arena[node].parent, move |&p| self.arena[p].parent)
    }

    pub fn is_ancestor_or_self(&self, ancestor: Index, node: Index) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }
}

impl<V: PartialEq> NodeArena<V> {
    pub fn find_child_with_value(&self, node: Index, value: &V) -> Option<Index> {
        self.arena[node]
            .children
            .iter()
            .copied()
            .find(|&c| self.arena[c].value == *value)
    }

    pub fn index_of_child_with_value(&self, node: Index, value: &V) -> Option<usize> {
        self.arena[node]
            .children
            .iter()
            .position(|&c| self.arena[c].value == *value)
    }

    /// No-op when no child holds `value`.
    pub fn remove_child_with_value(&mut self, node: Index, value: &V) -> bool {
        match self.index_of_child_with_value(node, value) {
            Some(index) => self.remove_child_at(node, index).is_ok(),
            None => false,
        }
    }

    /// Equal values all the way up: both chains must end at a parentless node
    /// at the same time. Walks iteratively, bounded by the shallower depth.
    pub fn compares_equal(&self, a: Index, other: &NodeArena<V>, b: Index) -> bool {
        let (mut a, mut b) = (Some(a), Some(b));
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    let (left, right) = (&self.arena[x], &other.arena[y]);
                    if left.value != right.value {
                        return false;
                    }
                    a = left.parent;
                    b = right.parent;
                }
                _ => return false,
            }
        }
    }
}
