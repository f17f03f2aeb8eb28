//! # Clone Command Implementation
//!
//! Materializes working copies. Without `--include-lazy`, lazy nodes that
//! were never cloned are left alone, so `grove clone -r` fetches exactly the
//! eager part of the tree. Naming a lazy node directly without the flag
//! clones nothing and prints a hint.

use anyhow::Result;
use clap::Args;

use super::progress::SpinnerObserver;
use super::{report, Context, TargetArgs};
use grove::engine::GitOperation;
use grove::output::emoji;
use grove::path::TreePath;
use grove::repository::CloneOptions;
use grove::suggestions;
use grove::tree::{Node, TreeProvider};

/// Clone missing working copies
#[derive(Args, Debug)]
pub struct CloneArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Also clone lazy nodes
    #[arg(long)]
    pub include_lazy: bool,

    /// Create shallow clones with this many commits
    #[arg(long, value_name = "NUM")]
    pub depth: Option<u32>,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, context: &Context) -> Result<()> {
    let observer = SpinnerObserver::new(&context.output);
    let bar = observer.bar();
    let mut manager = context.manager_with(Box::new(observer))?;

    let start = manager
        .resolve(args.target.input())
        .map_err(suggestions::explain)?;
    let hint = lazy_hint(manager.tree()?.get_node(&start)?, &start, args.include_lazy);

    let mut options = manager.traversal(args.target.recursive, args.include_lazy);
    options.clone_options = CloneOptions { depth: args.depth };
    let result = manager.run(args.target.input(), &GitOperation::Clone, &options);
    bar.finish_and_clear();
    let summary = result.map_err(suggestions::explain)?;
    report(context, "clone", &summary)?;

    if let Some(hint) = hint {
        eprintln!("{} {}", emoji(&context.output, "💡", "[HINT]"), hint);
    }
    Ok(())
}

/// Hint for a start node that the lazy rule would skip silently.
fn lazy_hint(node: &Node, path: &TreePath, include_lazy: bool) -> Option<String> {
    if node.is_repository() && node.is_lazy && !node.is_cloned && !include_lazy {
        Some(format!(
            "{} is lazy and was not cloned, pass --include-lazy to clone it",
            path
        ))
    } else {
        None
    }
}
