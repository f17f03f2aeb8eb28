//! # Remove Command Implementation
//!
//! Detaches a node with its whole subtree, deletes its directory and saves
//! the parent level. Asks for confirmation unless `--yes` is given.

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

use super::Context;
use grove::output::emoji;
use grove::suggestions;

/// Remove a node and its subtree
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Node name or tree path
    #[arg(value_name = "NAME|PATH")]
    pub target: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, context: &Context) -> Result<()> {
    let mut manager = context.manager()?;
    let path = manager.resolve(&args.target).map_err(suggestions::explain)?;
    let dir = manager.node_dir(&path).map_err(suggestions::explain)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Remove {} and delete {}?",
                path,
                dir.display()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    let outcome = manager
        .remove(&path.to_string())
        .map_err(suggestions::explain)?;

    for warning in &outcome.warnings {
        eprintln!("{} {}", emoji(&context.output, "⚠️ ", "[WARN]"), warning);
    }
    println!(
        "{} Removed {} ({} nodes)",
        emoji(&context.output, "🗑️ ", "[OK]"),
        outcome.path,
        outcome.removed.len()
    );
    Ok(())
}
