//! # Error Handling
//!
//! This module defines the centralized error type for the `grove` library.
//! It uses `thiserror` to describe every failure the core can report, with
//! enough context (paths, URLs, git stderr) for the CLI to print a useful
//! message.
//!
//! Errors fall into three groups:
//!
//! - **Structural**: the workspace is not initialized, a tree path cannot be
//!   resolved, or a tree-definition document cannot be parsed. These abort a
//!   command.
//! - **Per-node operational**: a git subprocess failed for one repository.
//!   During a recursive traversal these are captured in the operation summary
//!   instead of being returned.
//! - **Best-effort**: persistence or cleanup failures during structural
//!   mutations. These are logged as warnings and never returned.
//!
//! The `Result` alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for grove operations
#[derive(Error, Debug)]
pub enum Error {
    /// No workspace document was found, or the manager was used before it
    /// loaded its tree.
    #[error("Workspace not initialized: {message}")]
    NotInitialized { message: String },

    /// A tree path or filesystem path does not map to any node.
    #[error("Node not found: {path}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    NodeNotFound {
        path: String,
        /// Optional hint, usually the closest sibling names
        hint: Option<String>,
    },

    /// A sibling with the same name already exists under the parent.
    #[error("Node already exists: {path}")]
    DuplicateNode { path: String },

    /// A node name is empty, contains a separator, or is a dot segment.
    #[error("Invalid node name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A tree-definition document could not be parsed or failed validation.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the document
        hint: Option<String>,
    },

    /// Config references form a loop.
    #[error("Cycle detected in config references: {cycle}")]
    CycleDetected { cycle: String },

    /// Cloning a repository failed.
    #[error("Git clone error for {url} into {}: {message}", path.display())]
    GitClone {
        url: String,
        path: PathBuf,
        message: String,
    },

    /// A git command exited unsuccessfully or could not be spawned.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// The clone target already holds something that is not this repository.
    #[error("Cannot clone into {}: {message}", path.display())]
    CloneConflict { path: PathBuf, message: String },

    /// The requested mutation is not valid for the node in its current state.
    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    /// A filesystem provider operation failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a `NodeNotFound` without a hint.
    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NodeNotFound {
            path: path.into(),
            hint: None,
        }
    }

    /// True for the errors that must abort a whole command.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::NotInitialized { .. }
                | Error::NodeNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::CycleDetected { .. }
                | Error::Yaml(_)
        )
    }
}
