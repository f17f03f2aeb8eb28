//! # Status Command Implementation
//!
//! Reports the working-tree state of nodes, one line per node, or as JSON
//! with `--json`. Lazy nodes that were never cloned are not listed.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{check_failures, report, Context, TargetArgs};
use grove::git::GitStatus;
use grove::output::status_line;
use grove::suggestions;

/// Show the working-tree status of nodes
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusEntry<'a> {
    path: String,
    #[serde(flatten)]
    status: &'a GitStatus,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, context: &Context) -> Result<()> {
    let mut manager = context.manager()?;
    let summary = manager
        .status_node(args.target.input(), args.target.recursive)
        .map_err(suggestions::explain)?;

    if args.json {
        let entries: Vec<StatusEntry> = summary
            .statuses
            .iter()
            .map(|(path, status)| StatusEntry {
                path: path.to_string(),
                status,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        for failure in &summary.failures {
            eprintln!("{}: {}", failure.path, failure.error);
        }
        return check_failures(&summary);
    }

    for (path, status) in &summary.statuses {
        println!("{}", status_line(&context.output, path, status));
        for file in &status.files {
            println!("    {}", file);
        }
    }
    report(context, "status", &summary)
}
