//! # Commit Command Implementation
//!
//! Stages everything and commits in each node with changes. Clean nodes are
//! reported as skipped.

use anyhow::Result;
use clap::Args;

use super::progress::SpinnerObserver;
use super::{report, Context, TargetArgs};
use grove::suggestions;

/// Stage and commit all changes in nodes
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long, value_name = "MSG")]
    pub message: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the `commit` command.
pub fn execute(args: CommitArgs, context: &Context) -> Result<()> {
    if args.message.trim().is_empty() {
        anyhow::bail!("Commit message must not be empty");
    }

    let observer = SpinnerObserver::new(&context.output);
    let bar = observer.bar();
    let mut manager = context.manager_with(Box::new(observer))?;

    let result = manager.commit_node(args.target.input(), &args.message, args.target.recursive);
    bar.finish_and_clear();
    let summary = result.map_err(suggestions::explain)?;
    report(context, "commit", &summary)
}
