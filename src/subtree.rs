//! In-place view of part of a tree.
//!
//! A `Subtree` borrows its tree mutably and addresses everything relative to
//! its own root. Nothing is copied: every change lands in the owning tree,
//! whose depth cache is maintained through the view.

use std::fmt;

use generational_arena::Index;

use crate::address::Address;
use crate::errors::TreeResult;
use crate::node::NodeRef;
use crate::tree::{render_levels, NodeId, Tree};

pub struct Subtree<'t, V> {
    tree: &'t mut Tree<V>,
    root: Index,
}

impl<'t, V> Subtree<'t, V> {
    pub(crate) fn new(tree: &'t mut Tree<V>, root: Index) -> Self {
        Self { tree, root }
    }

    pub fn root(&self) -> NodeRef<'_, V> {
        self.tree.node_ref(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.node_id(self.root)
    }

    pub fn add_range_at<I>(&mut self, address: &Address, values: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = V>,
    {
        self.tree.add_range_from(self.root, address, values)
    }

    pub fn add_at(&mut self, address: &Address, value: V) -> TreeResult<NodeId> {
        self.tree.add_from(self.root, address, value)
    }

    pub fn add_at_root(&mut self, value: V) -> TreeResult<NodeId> {
        self.tree.add_from(self.root, &Address::ROOT, value)
    }

    pub fn add_range_at_root<I>(&mut self, values: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = V>,
    {
        self.tree.add_range_from(self.root, &Address::ROOT, values)
    }

    pub fn graft_range_at<I>(&mut self, address: &Address, trees: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = Tree<V>>,
    {
        self.tree.graft_range_from(self.root, address, trees)
    }

    pub fn graft_at(&mut self, address: &Address, tree: Tree<V>) -> TreeResult<NodeId> {
        self.tree.graft_from(self.root, address, tree)
    }

    pub fn graft_at_root(&mut self, tree: Tree<V>) -> TreeResult<NodeId> {
        self.tree.graft_from(self.root, &Address::ROOT, tree)
    }

    pub fn graft_range_at_root<I>(&mut self, trees: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = Tree<V>>,
    {
        self.tree.graft_range_from(self.root, &Address::ROOT, trees)
    }

    pub fn remove_node_at(&mut self, address: &Address) -> TreeResult<()> {
        self.tree.remove_from(self.root, address, true)
    }

    /// The view's root address clears its children; the view root itself stays.
    pub fn remove_subtree_at(&mut self, address: &Address, keep_children: bool) -> TreeResult<()> {
        self.tree.remove_from(self.root, address, keep_children)
    }

    pub fn get_subtree_at(&mut self, address: &Address) -> TreeResult<Subtree<'_, V>> {
        let root = self.tree.resolve(self.root, address)?;
        Ok(Subtree::new(self.tree, root))
    }

    pub fn get_node_at_address(&self, address: &Address) -> TreeResult<NodeRef<'_, V>> {
        let index = self.tree.resolve(self.root, address)?;
        Ok(self.tree.node_ref(index))
    }

    pub fn enumerate(&self, forwards: bool) -> Vec<NodeRef<'_, V>> {
        self.tree.enumerate_from(self.root, forwards)
    }
}

impl<V: PartialEq> Subtree<'_, V> {
    /// Address relative to this view's root.
    pub fn find_address_of(&self, value: &V) -> Option<Address> {
        self.tree.find_address_from(self.root, value)
    }
}

impl<V: fmt::Display> Subtree<'_, V> {
    pub fn render(&self, forwards: bool) -> String {
        render_levels(&self.enumerate(forwards))
    }
}

impl<V: fmt::Display> fmt::Display for Subtree<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root().render_subtree())
    }
}
