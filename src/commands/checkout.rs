//! Checkout command implementation

use anyhow::Result;
use clap::Args;

use super::progress::SpinnerObserver;
use super::{report, Context, TargetArgs};
use grove::suggestions;

/// Switch nodes to a branch
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Branch to switch to
    #[arg(value_name = "BRANCH")]
    pub branch: String,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Create the branch
    #[arg(short = 'b', long)]
    pub create: bool,
}

/// Execute the `checkout` command.
pub fn execute(args: CheckoutArgs, context: &Context) -> Result<()> {
    let observer = SpinnerObserver::new(&context.output);
    let bar = observer.bar();
    let mut manager = context.manager_with(Box::new(observer))?;

    let result = manager.checkout_node(
        args.target.input(),
        &args.branch,
        args.create,
        args.target.recursive,
    );
    bar.finish_and_clear();
    let summary = result.map_err(suggestions::explain)?;
    report(context, "checkout", &summary)
}
