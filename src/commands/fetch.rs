//! Fetch command implementation

use anyhow::Result;
use clap::Args;

use super::progress::SpinnerObserver;
use super::{report, Context, TargetArgs};
use grove::suggestions;

/// Fetch remotes of nodes
#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Remove remote-tracking branches that no longer exist
    #[arg(short, long)]
    pub prune: bool,
}

/// Execute the `fetch` command.
pub fn execute(args: FetchArgs, context: &Context) -> Result<()> {
    let observer = SpinnerObserver::new(&context.output);
    let bar = observer.bar();
    let mut manager = context.manager_with(Box::new(observer))?;

    let result = manager.fetch_node(args.target.input(), args.target.recursive, args.prune);
    bar.finish_and_clear();
    let summary = result.map_err(suggestions::explain)?;
    report(context, "fetch", &summary)
}
