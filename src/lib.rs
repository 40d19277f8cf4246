//! Address-indexed mutable trees.
//!
//! A [`Tree`] owns its nodes in a generational arena. Nodes are reached by
//! [`Address`] (child positions from the root) or by [`NodeId`]; whole trees
//! can be grafted below any node of another tree, which moves their nodes
//! over and consumes the source tree.
//!
//! ```
//! use graftree::{Address, Tree};
//!
//! let mut tree = Tree::new(1);
//! tree.add_range_at_root([2, 3]);
//! tree.add_range_at(&Address::full([0]), [4, 5]).unwrap();
//!
//! assert_eq!(tree.depth(), 3);
//! assert_eq!(tree.find_address_of(&4), Some(Address::full([0, 0])));
//! assert_eq!(tree.render(true), "[1]\n[2] [3]\n[4] [5]");
//! ```

pub mod address;
mod arena;
pub mod cli;
pub mod config;
pub mod display;
pub mod errors;
pub mod exitcode;
pub mod node;
pub mod subtree;
pub mod tree;
pub mod util;

pub use address::Address;
pub use config::{GlyphStyle, RenderSettings, Settings};
pub use errors::{SettingsError, TreeError, TreeResult};
pub use node::{NodeMut, NodeRef};
pub use subtree::Subtree;
pub use tree::{BreadthFirst, NodeId, Tree, TreeId};
