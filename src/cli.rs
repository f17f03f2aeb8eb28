//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, Context};
use grove::defaults::WORKSPACE_ENV;
use grove::output::OutputConfig;

/// Grove - Organize many git repositories into one navigable tree
#[derive(Parser, Debug)]
#[command(name = "grove")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Workspace root, skipping discovery from the current directory
    #[arg(long, global = true, value_name = "DIR", env = WORKSPACE_ENV)]
    workspace: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a grove.yaml in a directory
    Init(commands::init::InitArgs),

    /// Display the node tree
    Tree(commands::tree::TreeArgs),

    /// List the children of a node
    List(commands::list::ListArgs),

    /// Show the node a path resolves to
    Current(commands::current::CurrentArgs),

    /// Print the directory of a node
    Path(commands::path::PathArgs),

    /// Add a repository node
    Add(commands::add::AddArgs),

    /// Remove a node and its subtree
    Remove(commands::remove::RemoveArgs),

    /// Clone missing working copies
    Clone(commands::clone::CloneArgs),

    /// Pull nodes
    Pull(commands::pull::PullArgs),

    /// Push nodes
    Push(commands::push::PushArgs),

    /// Stage and commit all changes in nodes
    Commit(commands::commit::CommitArgs),

    /// Show the working-tree status of nodes
    Status(commands::status::StatusArgs),

    /// Fetch remotes of nodes
    Fetch(commands::fetch::FetchArgs),

    /// Switch nodes to a branch
    Checkout(commands::checkout::CheckoutArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let context = Context {
            workspace: self.workspace,
            output: OutputConfig::from_env_and_flag(&self.color),
        };
        if !context.output.use_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &context),
            Commands::Tree(args) => commands::tree::execute(args, &context),
            Commands::List(args) => commands::list::execute(args, &context),
            Commands::Current(args) => commands::current::execute(args, &context),
            Commands::Path(args) => commands::path::execute(args, &context),
            Commands::Add(args) => commands::add::execute(args, &context),
            Commands::Remove(args) => commands::remove::execute(args, &context),
            Commands::Clone(args) => commands::clone::execute(args, &context),
            Commands::Pull(args) => commands::pull::execute(args, &context),
            Commands::Push(args) => commands::push::execute(args, &context),
            Commands::Commit(args) => commands::commit::execute(args, &context),
            Commands::Status(args) => commands::status::execute(args, &context),
            Commands::Fetch(args) => commands::fetch::execute(args, &context),
            Commands::Checkout(args) => commands::checkout::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when it is set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
