//! Path command implementation
//!
//! Prints only the directory, so shells can `cd "$(grove path api)"`.

use anyhow::Result;
use clap::Args;

use super::Context;
use grove::suggestions;

/// Print the directory of a node
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Node name, tree path or directory (defaults to the current node)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Execute the `path` command.
pub fn execute(args: PathArgs, context: &Context) -> Result<()> {
    let manager = context.manager()?;
    let path = manager
        .resolve(args.path.as_deref().unwrap_or(""))
        .map_err(suggestions::explain)?;
    let dir = manager.node_dir(&path).map_err(suggestions::explain)?;
    println!("{}", dir.display());
    Ok(())
}
