use tracing::{debug, instrument};

use crate::address::Address;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::errors::TreeResult;
use crate::tree::Tree;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let tree = demo_tree(cli.graft_at.as_ref())?;
    debug!(depth = tree.depth(), nodes = tree.node_count(), "demo tree built");

    match &cli.command {
        None => _levels(&tree, false),
        Some(Commands::Levels { reverse }) => _levels(&tree, *reverse),
        Some(Commands::Tree { address }) => _tree(&tree, address, &settings),
        Some(Commands::Find { value }) => _find(&tree, *value),
        Some(Commands::Distance { a, b }) => _distance(&tree, a, b),
        Some(Commands::Config) => _config(&settings),
    }
}

/// Root 1 with children 2 and 3, and 4, 5 below 2; optionally 10 -> 11 grafted at `graft_at`.
#[instrument]
pub fn demo_tree(graft_at: Option<&Address>) -> TreeResult<Tree<i64>> {
    let mut tree = Tree::new(1);
    tree.add_range_at_root([2, 3]);
    tree.add_range_at(&Address::full([0]), [4, 5])?;

    if let Some(address) = graft_at {
        let mut branch = Tree::new(10);
        branch.add_at_root(11);
        tree.graft_at(address, branch)?;
    }
    Ok(tree)
}

fn _levels(tree: &Tree<i64>, reverse: bool) -> CliResult<()> {
    output::info(&tree.render(!reverse));
    Ok(())
}

fn _tree(tree: &Tree<i64>, address: &Address, settings: &Settings) -> CliResult<()> {
    let node = tree.get_node_at_address(address)?;
    output::info(node.render_subtree_with(&settings.render).trim_end());
    Ok(())
}

fn _find(tree: &Tree<i64>, value: i64) -> CliResult<()> {
    match tree.find_address_of(&value) {
        Some(address) => output::action("found", &address),
        None => output::info(&format!("{} not found", value)),
    }
    Ok(())
}

fn _distance(tree: &Tree<i64>, a: &Address, b: &Address) -> CliResult<()> {
    let a = tree.get_node_at_address(a)?.id();
    let b = tree.get_node_at_address(b)?.id();
    let (ancestor, distance) = tree.find_closest_common_ancestor(a, b)?;
    output::action("ancestor", &format!("{} at {}", ancestor.value(), ancestor.address()));
    output::action("distance", &distance);
    Ok(())
}

fn _config(settings: &Settings) -> CliResult<()> {
    output::header("# effective settings");
    output::info(&settings.to_toml_string()?);
    Ok(())
}
