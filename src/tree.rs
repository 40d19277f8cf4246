//! Address-indexed tree owning its nodes in a generational arena.
//!
//! `Tree` owns all depth bookkeeping and address resolution; structural child
//! mutation is delegated to [`NodeArena`]. The cached `depth` is an upper bound
//! that adds and grafts raise monotonically and removals recompute from scratch.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::address::Address;
use crate::arena::NodeArena;
use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeMut, NodeRef};
use crate::subtree::Subtree;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a tree; stamps every [`NodeId`] it hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

/// Handle to a node of a specific tree.
///
/// Ids of removed nodes, and ids of nodes that were grafted into another tree,
/// no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tree: TreeId,
    pub(crate) index: Index,
}

impl NodeId {
    pub fn tree(&self) -> TreeId {
        self.tree
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "{}/node#{}.{}", self.tree, slot, generation)
    }
}

#[derive(Debug)]
pub struct Tree<V> {
    pub(crate) id: TreeId,
    pub(crate) nodes: NodeArena<V>,
    pub(crate) root: Index,
    pub(crate) depth: usize,
}

impl<V: Default> Default for Tree<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

/// Deep copy with a fresh identity: ids of the original do not resolve in the copy.
impl<V: Clone> Clone for Tree<V> {
    fn clone(&self) -> Self {
        Self {
            id: TreeId::next(),
            nodes: self.nodes.clone(),
            root: self.root,
            depth: self.depth,
        }
    }
}

impl<V> Tree<V> {
    pub fn new(root_value: V) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.insert_root(root_value);
        Self {
            id: TreeId::next(),
            nodes,
            root,
            depth: 1,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Maximum level over all nodes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeRef<'_, V> {
        self.node_ref(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.node_id(self.root)
    }

    pub fn root_mut(&mut self) -> NodeMut<'_, V> {
        let root = self.root;
        NodeMut::new(self, root)
    }

    pub fn node(&self, id: NodeId) -> TreeResult<NodeRef<'_, V>> {
        let index = self.index_of(id)?;
        Ok(self.node_ref(index))
    }

    pub fn node_mut(&mut self, id: NodeId) -> TreeResult<NodeMut<'_, V>> {
        let index = self.index_of(id)?;
        Ok(NodeMut::new(self, index))
    }

    pub fn iter(&self) -> BreadthFirst<'_, V> {
        BreadthFirst::new(self, self.root)
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    /// Appends `values` as children of the addressed node, in order.
    ///
    /// Empty `values` is a no-op, even for an address that does not resolve.
    /// Otherwise nothing is inserted when the address does not resolve.
    pub fn add_range_at<I>(&mut self, address: &Address, values: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = V>,
    {
        self.add_range_from(self.root, address, values)
    }

    pub fn add_at(&mut self, address: &Address, value: V) -> TreeResult<NodeId> {
        self.add_from(self.root, address, value)
    }

    pub fn add_at_root(&mut self, value: V) -> NodeId {
        self.root_mut().add_child(value)
    }

    pub fn add_range_at_root<I>(&mut self, values: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = V>,
    {
        self.root_mut().add_children(values)
    }

    // ------------------------------------------------------------------
    // Graft
    // ------------------------------------------------------------------

    /// Moves the root of every tree in `trees`, with its subtree, below the
    /// addressed node. The source trees are consumed.
    ///
    /// The address is resolved before anything is moved; when it fails the
    /// source trees are dropped and this tree is left untouched.
    pub fn graft_range_at<I>(&mut self, address: &Address, trees: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = Tree<V>>,
    {
        self.graft_range_from(self.root, address, trees)
    }

    pub fn graft_at(&mut self, address: &Address, tree: Tree<V>) -> TreeResult<NodeId> {
        self.graft_from(self.root, address, tree)
    }

    pub fn graft_at_root(&mut self, tree: Tree<V>) -> TreeResult<NodeId> {
        self.graft_from(self.root, &Address::ROOT, tree)
    }

    pub fn graft_range_at_root<I>(&mut self, trees: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = Tree<V>>,
    {
        self.graft_range_from(self.root, &Address::ROOT, trees)
    }

    // ------------------------------------------------------------------
    // Remove
    // ------------------------------------------------------------------

    /// Removes the addressed node; its children move up into its place.
    pub fn remove_node_at(&mut self, address: &Address) -> TreeResult<()> {
        self.remove_from(self.root, address, true)
    }

    /// Removes the addressed node, discarding its subtree unless `keep_children`.
    /// The root address clears the root's children; the root itself stays.
    pub fn remove_subtree_at(&mut self, address: &Address, keep_children: bool) -> TreeResult<()> {
        self.remove_from(self.root, address, keep_children)
    }

    /// Takes the addressed node and its subtree out of this tree and makes it
    /// the root of a new tree.
    #[instrument(level = "debug", skip(self))]
    pub fn split_off_at(&mut self, address: &Address) -> TreeResult<Tree<V>> {
        if address.is_root() {
            return Err(TreeError::RootIsAnchored);
        }
        let node = self.resolve(self.root, address)?;
        let mut nodes = NodeArena::new();
        let root = nodes
            .transplant(&mut self.nodes, node, None)
            .ok_or_else(|| TreeError::AddressNotFound(address.clone()))?;
        let mut split = Tree {
            id: TreeId::next(),
            nodes,
            root,
            depth: 1,
        };
        split.recompute_depth();
        self.recompute_depth();
        debug!(size = split.node_count(), depth = self.depth, "split off subtree");
        Ok(split)
    }

    // ------------------------------------------------------------------
    // Get
    // ------------------------------------------------------------------

    /// Mutable view rooted at the addressed node; changes apply to this tree.
    pub fn get_subtree_at(&mut self, address: &Address) -> TreeResult<Subtree<'_, V>> {
        let root = self.resolve(self.root, address)?;
        Ok(Subtree::new(self, root))
    }

    pub fn get_node_at_address(&self, address: &Address) -> TreeResult<NodeRef<'_, V>> {
        let index = self.resolve(self.root, address)?;
        Ok(self.node_ref(index))
    }

    /// All nodes in breadth-first order, reversed afterwards when `!forwards`.
    pub fn enumerate(&self, forwards: bool) -> Vec<NodeRef<'_, V>> {
        self.enumerate_from(self.root, forwards)
    }

    // ------------------------------------------------------------------
    // Ancestry
    // ------------------------------------------------------------------

    /// Closest common ancestor of `a` and `b` and the number of edges between them.
    #[instrument(level = "debug", skip(self))]
    pub fn find_closest_common_ancestor(
        &self,
        a: NodeId,
        b: NodeId,
    ) -> TreeResult<(NodeRef<'_, V>, usize)> {
        if a.tree != b.tree {
            return Err(TreeError::CrossTree { a, b });
        }
        let mut a = self.index_of(a)?;
        let mut b = self.index_of(b)?;

        if a == self.root {
            return Ok((self.node_ref(a), self.nodes[b].level - 1));
        }
        if b == self.root {
            return Ok((self.node_ref(b), self.nodes[a].level - 1));
        }

        let mut distance = 0;
        while self.nodes[b].level > self.nodes[a].level {
            b = self.parent_of(b)?;
            distance += 1;
        }
        while self.nodes[a].level > self.nodes[b].level {
            a = self.parent_of(a)?;
            distance += 1;
        }
        while a != b {
            a = self.parent_of(a)?;
            b = self.parent_of(b)?;
            distance += 2;
        }
        Ok((self.node_ref(a), distance))
    }

    pub fn find_closest_ancestor(&self, a: NodeId, b: NodeId) -> TreeResult<NodeRef<'_, V>> {
        self.find_closest_common_ancestor(a, b)
            .map(|(ancestor, _)| ancestor)
    }

    pub fn find_distance(&self, a: NodeId, b: NodeId) -> TreeResult<usize> {
        self.find_closest_common_ancestor(a, b)
            .map(|(_, distance)| distance)
    }

    /// Recomputes `depth` by full enumeration.
    #[instrument(level = "debug", skip(self))]
    pub fn recompute_depth(&mut self) -> usize {
        self.depth = self
            .nodes
            .breadth_first(self.root)
            .into_iter()
            .map(|idx| self.nodes[idx].level)
            .max()
            .unwrap_or(1);
        self.depth
    }

    // ------------------------------------------------------------------
    // Internals shared with `Subtree` and `NodeMut`; `base` is the node that
    // addresses are relative to.
    // ------------------------------------------------------------------

    pub(crate) fn node_id(&self, index: Index) -> NodeId {
        NodeId {
            tree: self.id,
            index,
        }
    }

    pub(crate) fn node_ref(&self, index: Index) -> NodeRef<'_, V> {
        NodeRef::new(self, index)
    }

    pub(crate) fn index_of(&self, id: NodeId) -> TreeResult<Index> {
        if id.tree != self.id || !self.nodes.contains(id.index) {
            return Err(TreeError::UnknownNode(id));
        }
        Ok(id.index)
    }

    fn parent_of(&self, index: Index) -> TreeResult<Index> {
        self.nodes[index]
            .parent
            .ok_or_else(|| TreeError::UnknownNode(self.node_id(index)))
    }

    /// Walks from `base`, one child index per component. Addresses reaching
    /// below the cached depth are rejected before walking.
    pub(crate) fn resolve(&self, base: Index, address: &Address) -> TreeResult<Index> {
        let path = address.path();
        if self.nodes[base].level + path.len() > self.depth {
            return Err(TreeError::AddressNotFound(address.clone()));
        }
        path.iter().try_fold(base, |node, &i| {
            self.nodes
                .child_at(node, i)
                .map_err(|_| TreeError::AddressNotFound(address.clone()))
        })
    }

    /// Raises the depth cache for freshly attached nodes; never lowers it.
    pub(crate) fn raise_depth(&mut self, level: usize) {
        if level > self.depth {
            debug!(from = self.depth, to = level, "depth raised");
            self.depth = level;
        }
    }

    #[instrument(level = "debug", skip(self, values))]
    pub(crate) fn add_range_from<I>(
        &mut self,
        base: Index,
        address: &Address,
        values: I,
    ) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = V>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Ok(Vec::new());
        }
        let target = self.resolve(base, address)?;
        let added = self.nodes.add_children(target, values);
        if let Some(&first) = added.first() {
            self.raise_depth(self.nodes[first].level);
        }
        debug!(count = added.len(), "added children");
        Ok(added.into_iter().map(|idx| self.node_id(idx)).collect())
    }

    pub(crate) fn add_from(&mut self, base: Index, address: &Address, value: V) -> TreeResult<NodeId> {
        let target = self.resolve(base, address)?;
        let child = self.nodes.add_child(target, value);
        self.raise_depth(self.nodes[child].level);
        Ok(self.node_id(child))
    }

    pub(crate) fn graft_from(
        &mut self,
        base: Index,
        address: &Address,
        tree: Tree<V>,
    ) -> TreeResult<NodeId> {
        let target = self.resolve(base, address)?;
        self.graft_into(target, tree)
    }

    #[instrument(level = "debug", skip(self, trees))]
    pub(crate) fn graft_range_from<I>(
        &mut self,
        base: Index,
        address: &Address,
        trees: I,
    ) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = Tree<V>>,
    {
        let target = self.resolve(base, address)?;
        trees
            .into_iter()
            .map(|tree| self.graft_into(target, tree))
            .collect()
    }

    /// Moves `tree`'s nodes into this arena below `target`.
    pub(crate) fn graft_into(&mut self, target: Index, mut tree: Tree<V>) -> TreeResult<NodeId> {
        let source_root = tree.root_id();
        let grafted_depth = tree.depth;
        let moved = self
            .nodes
            .transplant(&mut tree.nodes, tree.root, Some(target))
            .ok_or(TreeError::UnknownNode(source_root))?;
        let target_level = self.nodes[target].level;
        self.raise_depth(target_level + grafted_depth);
        debug!(from = %source_root, depth = self.depth, "grafted tree");
        Ok(self.node_id(moved))
    }

    #[instrument(level = "debug", skip(self))]
    pub(crate) fn remove_from(
        &mut self,
        base: Index,
        address: &Address,
        keep_children: bool,
    ) -> TreeResult<()> {
        if address.is_root() {
            self.nodes.clear_children(base);
        } else {
            let node = self.resolve(base, address)?;
            if keep_children {
                self.nodes.splice_out(node);
            } else {
                let removed = self.nodes.remove_subtree(node);
                debug!(removed, "removed subtree");
            }
        }
        self.recompute_depth();
        Ok(())
    }

    /// Child indices on the way from `base` down to `node`.
    pub(crate) fn address_between(&self, base: Index, node: Index) -> Address {
        let mut path = Vec::new();
        let mut current = node;
        while current != base {
            let Some(parent) = self.nodes[current].parent else {
                break;
            };
            if let Some(position) = self.nodes.index_of_child(parent, current) {
                path.push(position);
            }
            current = parent;
        }
        path.reverse();
        Address::Full(path)
    }

    pub(crate) fn enumerate_from(&self, base: Index, forwards: bool) -> Vec<NodeRef<'_, V>> {
        let mut nodes: Vec<_> = BreadthFirst::new(self, base).collect();
        if !forwards {
            nodes.reverse();
        }
        nodes
    }
}

impl<V: PartialEq> Tree<V> {
    /// Address of the first node, in breadth-first order, holding `value`.
    ///
    /// `Some(Address::ROOT)` when the root matches, `None` when nothing does.
    pub fn find_address_of(&self, value: &V) -> Option<Address> {
        self.find_address_from(self.root, value)
    }

    pub(crate) fn find_address_from(&self, base: Index, value: &V) -> Option<Address> {
        let found = self
            .nodes
            .breadth_first(base)
            .into_iter()
            .find(|&idx| self.nodes[idx].value == *value)?;
        Some(self.address_between(base, found))
    }
}

impl<V: fmt::Display> Tree<V> {
    /// One line per level, each node as `[value]`.
    pub fn render(&self, forwards: bool) -> String {
        render_levels(&self.enumerate(forwards))
    }
}

pub(crate) fn render_levels<V: fmt::Display>(nodes: &[NodeRef<'_, V>]) -> String {
    let levels = nodes.iter().chunk_by(|node| node.level());
    let lines: Vec<String> = levels
        .into_iter()
        .map(|(_, level)| level.map(|node| format!("[{}]", node.value())).join(" "))
        .collect();
    lines.join("\n")
}

impl<V: fmt::Display> fmt::Display for Tree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root().render_subtree())
    }
}

/// Breadth-first iterator over the nodes below (and including) a start node.
pub struct BreadthFirst<'t, V> {
    tree: &'t Tree<V>,
    queue: VecDeque<Index>,
}

impl<'t, V> BreadthFirst<'t, V> {
    pub(crate) fn new(tree: &'t Tree<V>, start: Index) -> Self {
        Self {
            tree,
            queue: VecDeque::from([start]),
        }
    }
}

impl<'t, V> Iterator for BreadthFirst<'t, V> {
    type Item = NodeRef<'t, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        self.queue
            .extend(self.tree.nodes[current].children.iter().copied());
        Some(self.tree.node_ref(current))
    }
}

impl<'t, V> IntoIterator for &'t Tree<V> {
    type Item = NodeRef<'t, V>;
    type IntoIter = BreadthFirst<'t, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
