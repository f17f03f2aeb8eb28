//! Push command implementation

use anyhow::Result;
use clap::Args;

use super::progress::SpinnerObserver;
use super::{report, Context, TargetArgs};
use grove::engine::GitOperation;
use grove::suggestions;

/// Push nodes
#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Force-push (with lease)
    #[arg(short, long)]
    pub force: bool,

    /// Push the current branch to origin and track it
    #[arg(short = 'u', long)]
    pub set_upstream: bool,
}

/// Execute the `push` command.
pub fn execute(args: PushArgs, context: &Context) -> Result<()> {
    let observer = SpinnerObserver::new(&context.output);
    let bar = observer.bar();
    let mut manager = context.manager_with(Box::new(observer))?;

    let operation = GitOperation::Push {
        force: args.force,
        set_upstream: args.set_upstream,
    };
    let options = manager.traversal(args.target.recursive, false);
    let result = manager.run(args.target.input(), &operation, &options);
    bar.finish_and_clear();
    let summary = result.map_err(suggestions::explain)?;
    report(context, "push", &summary)
}
