//! Borrowed handles onto single nodes of a [`Tree`].

use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::address::Address;
use crate::config::RenderSettings;
use crate::display;
use crate::errors::{TreeError, TreeResult};
use crate::tree::{NodeId, Tree};

/// Read-only view of one node.
pub struct NodeRef<'t, V> {
    pub(crate) tree: &'t Tree<V>,
    pub(crate) index: Index,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("level", &self.level())
            .field("children", &self.child_count())
            .finish()
    }
}

impl<'t, V> NodeRef<'t, V> {
    pub(crate) fn new(tree: &'t Tree<V>, index: Index) -> Self {
        Self { tree, index }
    }

    fn at(&self, index: Index) -> NodeRef<'t, V> {
        NodeRef::new(self.tree, index)
    }

    pub fn id(&self) -> NodeId {
        self.tree.node_id(self.index)
    }

    pub fn value(&self) -> &'t V {
        &self.tree.nodes[self.index].value
    }

    /// 1 for the root, parent's level + 1 otherwise.
    pub fn level(&self) -> usize {
        self.tree.nodes[self.index].level
    }

    pub fn is_root(&self) -> bool {
        self.tree.nodes[self.index].parent.is_none()
    }

    /// No children.
    pub fn is_dead_end(&self) -> bool {
        self.tree.nodes[self.index].children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeRef<'t, V>> {
        self.tree.nodes[self.index].parent.map(|p| self.at(p))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t, V>> + 't {
        let tree = self.tree;
        tree.nodes[self.index]
            .children
            .iter()
            .map(move |&index| NodeRef::new(tree, index))
    }

    pub fn child_count(&self) -> usize {
        self.tree.nodes[self.index].children.len()
    }

    pub fn child_at(&self, index: usize) -> TreeResult<NodeRef<'t, V>> {
        let child = self.tree.nodes.child_at(self.index, index)?;
        Ok(self.at(child))
    }

    pub fn index_of_child(&self, child: &NodeRef<'_, V>) -> Option<usize> {
        if !std::ptr::eq(self.tree, child.tree) {
            return None;
        }
        self.tree.nodes.index_of_child(self.index, child.index)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t, V>> + 't {
        let tree = self.tree;
        tree.nodes
            .ancestors(self.index)
            .map(move |index| NodeRef::new(tree, index))
    }

    /// Address of this node relative to the tree root.
    pub fn address(&self) -> Address {
        let tree = self.tree;
        tree.address_between(tree.root, self.index)
    }
}

impl<'t, V: PartialEq> NodeRef<'t, V> {
    pub fn find_child_with_value(&self, value: &V) -> Option<NodeRef<'t, V>> {
        self.tree
            .nodes
            .find_child_with_value(self.index, value)
            .map(|c| self.at(c))
    }

    pub fn index_of_child_with_value(&self, value: &V) -> Option<usize> {
        self.tree.nodes.index_of_child_with_value(self.index, value)
    }

    /// Equal values and equal ancestry up to a parentless node.
    pub fn compares_equal(&self, other: &NodeRef<'_, V>) -> bool {
        self.tree
            .nodes
            .compares_equal(self.index, &other.tree.nodes, other.index)
    }
}

impl<V: PartialEq> PartialEq for NodeRef<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        self.compares_equal(other)
    }
}

impl<V: fmt::Display> NodeRef<'_, V> {
    /// Indented drawing of this node and everything below it.
    pub fn render_subtree(&self) -> String {
        self.render_subtree_with(&RenderSettings::default())
    }

    pub fn render_subtree_with(&self, settings: &RenderSettings) -> String {
        display::draw(self, settings)
    }
}

/// Mutable view of one node. Keeps the owning tree's depth cache in step.
pub struct NodeMut<'t, V> {
    tree: &'t mut Tree<V>,
    index: Index,
}

impl<'t, V> NodeMut<'t, V> {
    pub(crate) fn new(tree: &'t mut Tree<V>, index: Index) -> Self {
        Self { tree, index }
    }

    pub fn id(&self) -> NodeId {
        self.tree.node_id(self.index)
    }

    pub fn as_node(&self) -> NodeRef<'_, V> {
        self.tree.node_ref(self.index)
    }

    pub fn value(&self) -> &V {
        &self.tree.nodes[self.index].value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.tree.nodes[self.index].value
    }

    pub fn set_value(&mut self, value: V) {
        self.tree.nodes[self.index].value = value;
    }

    pub fn add_child(&mut self, value: V) -> NodeId {
        let child = self.tree.nodes.add_child(self.index, value);
        self.tree.raise_depth(self.tree.nodes[child].level);
        self.tree.node_id(child)
    }

    pub fn add_children<I>(&mut self, values: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = V>,
    {
        let added = self.tree.nodes.add_children(self.index, values);
        if let Some(&first) = added.first() {
            self.tree.raise_depth(self.tree.nodes[first].level);
        }
        added.into_iter().map(|c| self.tree.node_id(c)).collect()
    }

    /// Takes over `tree`'s root, with its subtree, as the last child of this node.
    pub fn graft(&mut self, tree: Tree<V>) -> TreeResult<NodeId> {
        self.tree.graft_into(self.index, tree)
    }

    pub fn graft_all<I>(&mut self, trees: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = Tree<V>>,
    {
        trees
            .into_iter()
            .map(|tree| self.tree.graft_into(self.index, tree))
            .collect()
    }

    /// Re-parents this node (and its subtree) below `new_parent` of the same tree.
    #[instrument(level = "debug", skip(self))]
    pub fn set_parent(&mut self, new_parent: NodeId) -> TreeResult<()> {
        let parent = self.tree.index_of(new_parent)?;
        if self.index == self.tree.root {
            return Err(TreeError::RootIsAnchored);
        }
        self.tree.nodes.set_parent(self.index, parent)?;
        self.tree.recompute_depth();
        debug!(level = self.tree.nodes[self.index].level, "re-parented node");
        Ok(())
    }

    /// Valid for `0 <= index < child_count`.
    pub fn remove_child_at(&mut self, index: usize) -> TreeResult<()> {
        self.tree.nodes.remove_child_at(self.index, index)?;
        self.tree.recompute_depth();
        Ok(())
    }

    pub fn clear_children(&mut self) {
        self.tree.nodes.clear_children(self.index);
        self.tree.recompute_depth();
    }
}

impl<V: PartialEq> NodeMut<'_, V> {
    /// Removes the first child holding `value`; no-op when there is none.
    pub fn remove_child_with_value(&mut self, value: &V) -> bool {
        let removed = self.tree.nodes.remove_child_with_value(self.index, value);
        if removed {
            self.tree.recompute_depth();
        }
        removed
    }
}
