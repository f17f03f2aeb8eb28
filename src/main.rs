//! # Grove CLI
//!
//! Binary entry point for the `grove` command-line tool. It parses the
//! arguments with `clap` and hands over to the command implementations,
//! which are thin wrappers around the `grove` library.
//!
//! Any error, including a traversal where some node failed, ends the process
//! with exit code 1.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
