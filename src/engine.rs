//! # Recursive Operation Engine
//!
//! Applies one [`GitOperation`] to a starting node and, when recursive, to
//! its descendants, collecting the per-node results in an
//! [`OperationSummary`].
//!
//! ## Traversal
//!
//! Nodes are visited depth-first, parent before children, one at a time. For
//! every node:
//!
//! 1. The cancellation token is checked. Once set, nothing else is visited.
//! 2. Grouping nodes (the root and config references) are not targets. The
//!    engine descends into their children.
//! 3. A lazy node that is not cloned is skipped silently together with its
//!    subtree, unless `include_lazy` is set.
//! 4. A node that is not cloned yet goes through the [`LazyCloner`] when the
//!    operation allows it. A failed clone is that node's failure and its
//!    subtree is not visited.
//! 5. The operation runs against the node's directory.
//! 6. Children are visited only when `recursive` is set.
//!
//! One node's failure never stops the traversal. The engine returns an error
//! only when the starting node does not exist.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::config::ConfigProvider;
use crate::error::{Error, Result};
use crate::filesystem::FileSystemProvider;
use crate::git::GitStatus;
use crate::layout::node_dir;
use crate::lazy::LazyCloner;
use crate::path::TreePath;
use crate::repository::{CloneOptions, FetchOptions, GitProvider, PullOptions, PushOptions};
use crate::tree::TreeProvider;

/// A git-level action applied per node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOperation {
    Clone,
    Pull { force: bool, rebase: bool },
    Push { force: bool, set_upstream: bool },
    Commit { message: String },
    Status,
    Fetch { prune: bool },
    Checkout { branch: String, create: bool },
}

impl GitOperation {
    /// Verb used in logs and progress output.
    pub fn name(&self) -> &'static str {
        match self {
            GitOperation::Clone => "clone",
            GitOperation::Pull { .. } => "pull",
            GitOperation::Push { .. } => "push",
            GitOperation::Commit { .. } => "commit",
            GitOperation::Status => "status",
            GitOperation::Fetch { .. } => "fetch",
            GitOperation::Checkout { .. } => "checkout",
        }
    }

    /// Whether a missing working copy is cloned on the way.
    fn materializes(&self) -> bool {
        matches!(self, GitOperation::Clone | GitOperation::Pull { .. })
    }
}

/// Cooperative cancellation, checked between node visits
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// How far a traversal reaches
#[derive(Debug, Clone, Default)]
pub struct TraversalOptions {
    pub recursive: bool,
    /// Clone lazy nodes instead of skipping them
    pub include_lazy: bool,
    /// Used for every clone the traversal starts
    pub clone_options: CloneOptions,
    pub cancel: CancellationToken,
}

impl TraversalOptions {
    pub fn recursive(recursive: bool) -> Self {
        Self {
            recursive,
            ..Self::default()
        }
    }

    pub fn with_lazy(mut self, include_lazy: bool) -> Self {
        self.include_lazy = include_lazy;
        self
    }
}

/// One node that failed
#[derive(Debug)]
pub struct NodeFailure {
    pub path: TreePath,
    pub name: String,
    pub error: Error,
}

/// How one visited node ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    Succeeded,
    Skipped { reason: String },
    Failed { message: String },
}

/// Aggregated result of one traversal
#[derive(Debug, Default)]
pub struct OperationSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<NodeFailure>,
    /// Status results, in visit order (status operations only)
    pub statuses: Vec<(TreePath, GitStatus)>,
    pub warnings: Vec<String>,
    /// Target nodes in the order they were processed
    pub visited: Vec<TreePath>,
    pub cancelled: bool,
}

impl OperationSummary {
    /// `"N succeeded, M failed"`
    pub fn summary_line(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded, self.failed)
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    fn record(&mut self, path: &TreePath, result: Result<NodeOutcome>) -> NodeOutcome {
        self.attempted += 1;
        self.visited.push(path.clone());
        match result {
            Ok(NodeOutcome::Succeeded) => {
                self.succeeded += 1;
                NodeOutcome::Succeeded
            }
            Ok(outcome @ NodeOutcome::Skipped { .. }) => {
                self.skipped += 1;
                outcome
            }
            Ok(outcome @ NodeOutcome::Failed { .. }) => {
                self.failed += 1;
                outcome
            }
            Err(error) => {
                warn!("{} failed: {}", path, error);
                let message = error.to_string();
                self.failed += 1;
                self.failures.push(NodeFailure {
                    path: path.clone(),
                    name: path.name().unwrap_or("/").to_string(),
                    error,
                });
                NodeOutcome::Failed { message }
            }
        }
    }
}

/// Progress hooks for a traversal
pub trait TraversalObserver: Send + Sync {
    fn node_started(&self, _path: &TreePath, _operation: &GitOperation) {}

    fn node_finished(&self, _path: &TreePath, _outcome: &NodeOutcome) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TraversalObserver for NoopObserver {}

/// Runs operations over a tree with injected collaborators
pub struct Engine<'a> {
    git: &'a dyn GitProvider,
    fs: &'a dyn FileSystemProvider,
    config: &'a dyn ConfigProvider,
    root_dir: &'a Path,
    observer: &'a dyn TraversalObserver,
}

impl<'a> Engine<'a> {
    pub fn new(
        git: &'a dyn GitProvider,
        fs: &'a dyn FileSystemProvider,
        config: &'a dyn ConfigProvider,
        root_dir: &'a Path,
        observer: &'a dyn TraversalObserver,
    ) -> Self {
        Self {
            git,
            fs,
            config,
            root_dir,
            observer,
        }
    }

    /// Apply `operation` from `start`.
    pub fn run(
        &self,
        tree: &mut dyn TreeProvider,
        start: &TreePath,
        operation: &GitOperation,
        options: &TraversalOptions,
    ) -> Result<OperationSummary> {
        tree.get_node(start)?;
        let mut summary = OperationSummary::default();
        self.visit(tree, start, operation, options, true, &mut summary)?;
        debug!("{} from {}: {}", operation.name(), start, summary.summary_line());
        Ok(summary)
    }

    fn visit(
        &self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
        operation: &GitOperation,
        options: &TraversalOptions,
        is_start: bool,
        summary: &mut OperationSummary,
    ) -> Result<()> {
        if options.cancel.is_cancelled() {
            summary.cancelled = true;
            return Ok(());
        }

        let node = tree.get_node(path)?.clone();

        if !node.is_repository() {
            // Grouping nodes hand the operation to their top-level children
            if options.recursive || is_start {
                self.visit_children(tree, path, operation, options, summary)?;
            }
            return Ok(());
        }

        if node.is_lazy && !node.is_cloned && !options.include_lazy {
            debug!("skipping lazy node {}", path);
            return Ok(());
        }

        self.observer.node_started(path, operation);
        let dir = node_dir(tree, self.root_dir, path)?;

        if !node.is_cloned {
            let wants_clone = node.is_lazy || operation.materializes();
            if !wants_clone {
                let message = format!("{} is not cloned, run 'grove clone' first", path);
                warn!("{}", message);
                summary.warnings.push(message);
                let outcome = summary.record(
                    path,
                    Ok(NodeOutcome::Skipped {
                        reason: "not cloned".to_string(),
                    }),
                );
                self.observer.node_finished(path, &outcome);
                return Ok(());
            }

            let cloner = LazyCloner::new(self.git, self.fs, self.config, self.root_dir)
                .with_options(options.clone_options.clone());
            if let Err(error) = cloner.ensure_cloned(tree, path, &mut summary.warnings) {
                let outcome = summary.record(path, Err(error));
                self.observer.node_finished(path, &outcome);
                return Ok(());
            }

            if *operation == GitOperation::Clone {
                let outcome = summary.record(path, Ok(NodeOutcome::Succeeded));
                self.observer.node_finished(path, &outcome);
                return self.after_node(tree, path, operation, options, summary);
            }
        }

        let result = self.apply(tree, path, &dir, operation, summary);
        let outcome = summary.record(path, result);
        self.observer.node_finished(path, &outcome);
        self.after_node(tree, path, operation, options, summary)
    }

    fn after_node(
        &self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
        operation: &GitOperation,
        options: &TraversalOptions,
        summary: &mut OperationSummary,
    ) -> Result<()> {
        if options.recursive {
            self.visit_children(tree, path, operation, options, summary)?;
        }
        Ok(())
    }

    fn visit_children(
        &self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
        operation: &GitOperation,
        options: &TraversalOptions,
        summary: &mut OperationSummary,
    ) -> Result<()> {
        // Read after the parent ran: a clone may have attached new children
        let children = tree.get_node(path)?.children.clone();
        for child in children {
            let child_path = path.join(&child)?;
            self.visit(tree, &child_path, operation, options, false, summary)?;
            if summary.cancelled {
                break;
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
        dir: &Path,
        operation: &GitOperation,
        summary: &mut OperationSummary,
    ) -> Result<NodeOutcome> {
        match operation {
            GitOperation::Clone => Ok(NodeOutcome::Skipped {
                reason: "already cloned".to_string(),
            }),
            GitOperation::Pull { force, rebase } => {
                self.git.pull(
                    dir,
                    &PullOptions {
                        force: *force,
                        rebase: *rebase,
                    },
                )?;
                Ok(NodeOutcome::Succeeded)
            }
            GitOperation::Push {
                force,
                set_upstream,
            } => {
                self.git.push(
                    dir,
                    &PushOptions {
                        force: *force,
                        set_upstream: *set_upstream,
                    },
                )?;
                Ok(NodeOutcome::Succeeded)
            }
            GitOperation::Commit { message } => {
                let status = self.git.status(dir)?;
                if status.is_clean {
                    return Ok(NodeOutcome::Skipped {
                        reason: "nothing to commit".to_string(),
                    });
                }
                self.git.add(dir, &[])?;
                self.git.commit(dir, message)?;
                self.set_has_changes(tree, path, false)?;
                Ok(NodeOutcome::Succeeded)
            }
            GitOperation::Status => {
                let status = self.git.status(dir)?;
                self.set_has_changes(tree, path, !status.is_clean)?;
                summary.statuses.push((path.clone(), status));
                Ok(NodeOutcome::Succeeded)
            }
            GitOperation::Fetch { prune } => {
                self.git.fetch(dir, &FetchOptions { prune: *prune })?;
                Ok(NodeOutcome::Succeeded)
            }
            GitOperation::Checkout { branch, create } => {
                self.git.checkout(dir, branch, *create)?;
                Ok(NodeOutcome::Succeeded)
            }
        }
    }

    fn set_has_changes(
        &self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
        has_changes: bool,
    ) -> Result<()> {
        let mut node = tree.get_node(path)?.clone();
        if node.has_changes != has_changes {
            node.has_changes = has_changes;
            tree.update_node(path, node)?;
        }
        Ok(())
    }
}
