//! # CLI Command Implementations
//!
//! Each subcommand of `grove` lives in its own file with:
//! - an `Args` struct derived with `clap`
//! - an `execute` function taking the parsed args and the shared [`Context`]
//!
//! Commands that walk the tree share [`TargetArgs`] and report through
//! [`report`], which turns node failures into a non-zero exit.

pub mod add;
pub mod checkout;
pub mod clone;
pub mod commit;
pub mod completions;
pub mod current;
pub mod fetch;
pub mod init;
pub mod list;
pub mod path;
pub mod progress;
pub mod pull;
pub mod push;
pub mod remove;
pub mod status;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;

use grove::engine::{NoopObserver, OperationSummary, TraversalObserver};
use grove::error::Error;
use grove::manager::{Manager, ManagerOptions};
use grove::output::{self, emoji, OutputConfig};
use grove::suggestions;

/// Global options every command sees
#[derive(Debug, Clone)]
pub struct Context {
    pub workspace: Option<PathBuf>,
    pub output: OutputConfig,
}

impl Context {
    /// Load the workspace around the current directory.
    pub fn manager(&self) -> Result<Manager> {
        self.manager_with(Box::new(NoopObserver))
    }

    /// Same as [`Context::manager`], reporting traversal progress to `observer`.
    pub fn manager_with(&self, observer: Box<dyn TraversalObserver>) -> Result<Manager> {
        let cwd = working_dir()?;
        let mut manager = Manager::new(ManagerOptions {
            workspace: self.workspace.clone(),
            cwd: cwd.clone(),
            observer,
            ..Default::default()
        });

        match manager.initialize() {
            Ok(()) => {}
            Err(Error::NotInitialized { .. }) if self.workspace.is_none() => {
                return Err(suggestions::workspace_not_found(&cwd));
            }
            Err(e) => return Err(suggestions::explain(e)),
        }

        for warning in manager.load_warnings() {
            eprintln!("{} {}", emoji(&self.output, "⚠️ ", "[WARN]"), warning);
        }
        Ok(manager)
    }
}

/// The working directory as the shell spells it.
///
/// `current_dir` has symlinks resolved. `PWD` keeps the path the user
/// navigated, which is the one that lies inside the workspace when a node
/// directory is a symlink. It is used only when it names the same directory.
fn working_dir() -> Result<PathBuf> {
    let physical = std::env::current_dir().context("Failed to get current directory")?;
    let logical = std::env::var_os("PWD").map(PathBuf::from);
    match logical {
        Some(pwd) if pwd.is_absolute() && same_dir(&pwd, &physical) => Ok(pwd),
        _ => Ok(physical),
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Where a tree-walking command starts and how far it goes
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Node name, tree path or directory (defaults to the current node)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Apply to the whole subtree
    #[arg(short, long)]
    pub recursive: bool,
}

impl TargetArgs {
    pub fn input(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }
}

/// Print the summary and fail when any node failed.
pub fn report(context: &Context, verb: &str, summary: &OperationSummary) -> Result<()> {
    output::print_summary(&context.output, verb, summary);
    check_failures(summary)
}

/// Turn node failures into an error without printing anything.
pub fn check_failures(summary: &OperationSummary) -> Result<()> {
    if summary.has_failures() {
        anyhow::bail!(
            "{} of {} nodes failed",
            summary.failed,
            summary.attempted
        );
    }
    Ok(())
}
