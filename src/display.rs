use std::collections::HashMap;
use std::fmt;

use generational_arena::Index;
use termtree::{GlyphPalette, Tree as TermTree};
use tracing::instrument;

use crate::arena::NodeArena;
use crate::config::{GlyphStyle, RenderSettings};
use crate::node::NodeRef;

const ASCII_GLYPHS: GlyphPalette = GlyphPalette {
    middle_item: "|",
    last_item: "`",
    item_indent: "-- ",
    middle_skip: "|",
    last_skip: " ",
    skip_indent: "   ",
};

pub trait ToTermTree {
    fn to_termtree(&self, settings: &RenderSettings) -> TermTree<String>;
}

impl<V: fmt::Display> ToTermTree for NodeRef<'_, V> {
    /// Builds bottom-up without recursion.
    #[instrument(level = "trace", skip_all)]
    fn to_termtree(&self, settings: &RenderSettings) -> TermTree<String> {
        let nodes = &self.tree.nodes;
        let mut built = HashMap::new();
        // reversed breadth-first order reaches every child before its parent
        for index in nodes.breadth_first(self.index).into_iter().skip(1).rev() {
            let tree = term_node(nodes, index, &mut built, settings);
            built.insert(index, tree);
        }
        term_node(nodes, self.index, &mut built, settings)
    }
}

fn term_node<V: fmt::Display>(
    nodes: &NodeArena<V>,
    index: Index,
    built: &mut HashMap<Index, TermTree<String>>,
    settings: &RenderSettings,
) -> TermTree<String> {
    let node = &nodes[index];
    let label = if settings.show_level {
        format!("{} (level {})", node.value, node.level)
    } else {
        node.value.to_string()
    };
    let leaves: Vec<_> = node
        .children
        .iter()
        .filter_map(|child| built.remove(child))
        .collect();

    let tree = TermTree::new(label).with_leaves(leaves);
    match settings.glyphs {
        GlyphStyle::Unicode => tree,
        GlyphStyle::Ascii => tree.with_glyphs(ASCII_GLYPHS),
    }
}

/// Draws `node` and everything below it.
pub(crate) fn draw<V: fmt::Display>(node: &NodeRef<'_, V>, settings: &RenderSettings) -> String {
    let tree = node.to_termtree(settings);
    let text = tree.to_string();
    dismantle(tree);
    text
}

/// Drops a drawing level by level; nested leaves would otherwise drop recursively.
fn dismantle(tree: TermTree<String>) {
    let mut pending = vec![tree];
    while let Some(mut tree) = pending.pop() {
        pending.append(&mut tree.leaves);
    }
}
