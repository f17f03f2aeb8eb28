//! List command implementation

use anyhow::Result;
use clap::Args;

use super::Context;
use grove::suggestions;
use grove::tree::{Node, TreeProvider};

/// List the children of a node
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Node name, tree path or directory (defaults to the current node)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, context: &Context) -> Result<()> {
    let manager = context.manager()?;
    let path = manager
        .resolve(args.path.as_deref().unwrap_or(""))
        .map_err(suggestions::explain)?;
    let children = manager
        .tree()?
        .list_children(&path)
        .map_err(suggestions::explain)?;

    if children.is_empty() {
        println!("{} has no children", path);
        return Ok(());
    }
    for child in children {
        println!("{}", describe(child));
    }
    Ok(())
}

fn describe(node: &Node) -> String {
    if let Some(file) = &node.config_file {
        return format!("{}/  -> {}", node.name, file);
    }
    let state = if node.is_cloned {
        "cloned"
    } else if node.is_lazy {
        "lazy"
    } else {
        "missing"
    };
    format!("{:<20} {:<8} {}", node.name, state, node.repository)
}
