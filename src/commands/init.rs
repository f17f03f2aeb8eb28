//! # Init Command Implementation
//!
//! Writes an empty `grove.yaml` so the directory becomes a workspace root.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;
use grove::config::YamlConfigProvider;
use grove::defaults::DEFAULT_REPOS_DIR;
use grove::manager::Manager;
use grove::output::emoji;
use grove::suggestions;

/// Create a grove.yaml in a directory
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Workspace name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory repositories are cloned into, relative to the workspace
    #[arg(long, value_name = "NAME", default_value = DEFAULT_REPOS_DIR)]
    pub repos_dir: String,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, context: &Context) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let name = match args.name {
        Some(name) => name,
        None => dir
            .canonicalize()
            .ok()
            .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "workspace".to_string()),
    };

    let path = Manager::init_workspace(
        &dir,
        &name,
        Some(args.repos_dir.as_str()),
        &YamlConfigProvider,
    )
    .map_err(suggestions::explain)?;

    println!(
        "{} Created {}",
        emoji(&context.output, "🌳", "[INIT]"),
        path.display()
    );
    println!("Add repositories with 'grove add <URL>'");
    Ok(())
}
