//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::address::Address;

/// Build the demo tree (1 -> 2, 3; 2 -> 4, 5) and inspect it
#[derive(Parser, Debug)]
#[command(name = "graftree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Graft the tree 10 -> 11 below this address first, e.g. "1" or "0,1"
    #[arg(short, long, global = true)]
    pub graft_at: Option<Address>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one line per level, each node as [value] (default)
    Levels {
        /// Bottom-up instead of top-down
        #[arg(short, long)]
        reverse: bool,
    },

    /// Draw the tree with branch glyphs
    Tree {
        /// Start drawing at this address (default: root)
        #[arg(default_value = "")]
        address: Address,
    },

    /// Print the address of the first node holding a value
    Find { value: i64 },

    /// Closest common ancestor of two nodes and the number of edges between them
    Distance { a: Address, b: Address },

    /// Print the effective settings as TOML
    Config,
}
