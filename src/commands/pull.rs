//! Pull command implementation

use anyhow::Result;
use clap::Args;

use super::progress::SpinnerObserver;
use super::{report, Context, TargetArgs};
use grove::engine::GitOperation;
use grove::suggestions;

/// Pull nodes
#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Pass --force to git pull
    #[arg(short, long)]
    pub force: bool,

    /// Rebase local commits onto the upstream instead of merging
    #[arg(long)]
    pub rebase: bool,

    /// Clone and pull lazy nodes that were never cloned
    #[arg(long)]
    pub include_lazy: bool,
}

/// Execute the `pull` command.
pub fn execute(args: PullArgs, context: &Context) -> Result<()> {
    let observer = SpinnerObserver::new(&context.output);
    let bar = observer.bar();
    let mut manager = context.manager_with(Box::new(observer))?;

    let operation = GitOperation::Pull {
        force: args.force,
        rebase: args.rebase,
    };
    let options = manager.traversal(args.target.recursive, args.include_lazy);
    let result = manager.run(args.target.input(), &operation, &options);
    bar.finish_and_clear();
    let summary = result.map_err(suggestions::explain)?;
    report(context, "pull", &summary)
}
