//! # Add Command Implementation
//!
//! This module implements the `add` subcommand, which declares a repository
//! as a child of the current node (or `--parent`) and saves the level's
//! `grove.yaml`.
//!
//! ## Functionality
//!
//! - **Name**: derived from the URL unless `--name` is given
//! - **Fetch mode**: `--lazy` or `--eager`, otherwise decided from the name
//! - **Eager clone**: eager nodes are cloned right away

use anyhow::Result;
use clap::Args;

use super::Context;
use grove::config::FetchMode;
use grove::manager::AddOptions;
use grove::output::emoji;
use grove::suggestions;

/// Add a repository node
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Repository URL
    #[arg(value_name = "URL")]
    pub url: String,

    /// Node name (defaults to the last URL segment without .git)
    #[arg(long)]
    pub name: Option<String>,

    /// Clone only when explicitly requested
    #[arg(long, conflicts_with = "eager")]
    pub lazy: bool,

    /// Clone immediately
    #[arg(long)]
    pub eager: bool,

    /// Parent node (defaults to the current node)
    #[arg(long, value_name = "PATH")]
    pub parent: Option<String>,
}

impl AddArgs {
    fn fetch_mode(&self) -> FetchMode {
        if self.lazy {
            FetchMode::Lazy
        } else if self.eager {
            FetchMode::Eager
        } else {
            FetchMode::Auto
        }
    }
}

/// Execute the `add` command.
pub fn execute(args: AddArgs, context: &Context) -> Result<()> {
    let mut manager = context.manager()?;
    let options = AddOptions {
        name: args.name.clone(),
        fetch: args.fetch_mode(),
        parent: args.parent.clone(),
    };

    let outcome = manager
        .add(&args.url, options)
        .map_err(suggestions::explain)?;

    for warning in &outcome.warnings {
        eprintln!("{} {}", emoji(&context.output, "⚠️ ", "[WARN]"), warning);
    }
    let state = if outcome.cloned { "cloned" } else { "lazy" };
    println!(
        "{} Added {} ({})",
        emoji(&context.output, "✅", "[OK]"),
        outcome.path,
        state
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(lazy: bool, eager: bool) -> AddArgs {
        AddArgs {
            url: "https://x/api.git".to_string(),
            name: None,
            lazy,
            eager,
            parent: None,
        }
    }

    #[test]
    fn test_fetch_mode_from_flags() {
        assert_eq!(args(true, false).fetch_mode(), FetchMode::Lazy);
        assert_eq!(args(false, true).fetch_mode(), FetchMode::Eager);
        assert_eq!(args(false, false).fetch_mode(), FetchMode::Auto);
    }
}
