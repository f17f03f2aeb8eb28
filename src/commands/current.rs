//! Current command implementation

use anyhow::Result;
use clap::Args;

use super::Context;
use grove::suggestions;
use grove::tree::TreeProvider;

/// Show the node a path resolves to
#[derive(Args, Debug)]
pub struct CurrentArgs {
    /// Node name, tree path or directory (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Execute the `current` command.
///
/// Prints the tree path, followed by details of the node.
pub fn execute(args: CurrentArgs, context: &Context) -> Result<()> {
    let manager = context.manager()?;
    let input = args.path.as_deref().unwrap_or("");
    let path = manager.resolve(input).map_err(suggestions::explain)?;
    let node = manager.tree()?.get_node(&path).map_err(suggestions::explain)?;

    println!("{}", path);
    if node.is_repository() {
        println!("  repository: {}", node.repository);
        println!("  fetch:      {:?}", node.fetch);
        println!("  cloned:     {}", node.is_cloned);
    }
    if let Some(file) = &node.config_file {
        println!("  file:       {}", file);
    }
    println!(
        "  directory:  {}",
        manager.node_dir(&path).map_err(suggestions::explain)?.display()
    );
    Ok(())
}
