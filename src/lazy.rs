//! # Lazy-Clone Coordinator
//!
//! Makes sure a node's working copy exists before an operation needs it.
//!
//! [`LazyCloner::ensure_cloned`] handles three situations at the target
//! directory:
//!
//! - **Nothing there**: parent directories are created and the repository is
//!   cloned. The node flips to cloned, the repository's own document (if
//!   any) is attached to the tree, and the declaring level is saved.
//! - **A `.git` already there**: the `origin` URL is compared with the node's
//!   URL. A match, or an unreadable remote, counts as already present and
//!   only the clone state is synced. A different URL is a `CloneConflict`.
//! - **Anything else**: a file or a non-empty directory without `.git` is a
//!   `CloneConflict`. An empty directory is cloned into.
//!
//! Saving the level and attaching the nested document are best-effort: their
//! failures come back as warnings, never as errors.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::ConfigProvider;
use crate::error::{Error, Result};
use crate::filesystem::FileSystemProvider;
use crate::layout::node_dir;
use crate::loader::{persist_level, TreeLoader};
use crate::path::TreePath;
use crate::repository::{CloneOptions, GitProvider};
use crate::tree::TreeProvider;

/// What `ensure_cloned` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    /// A clone was performed
    Cloned,
    /// The working copy was already on disk, only the state was synced
    AlreadyPresent,
}

pub struct LazyCloner<'a> {
    git: &'a dyn GitProvider,
    fs: &'a dyn FileSystemProvider,
    config: &'a dyn ConfigProvider,
    root_dir: &'a Path,
    options: CloneOptions,
}

impl<'a> LazyCloner<'a> {
    pub fn new(
        git: &'a dyn GitProvider,
        fs: &'a dyn FileSystemProvider,
        config: &'a dyn ConfigProvider,
        root_dir: &'a Path,
    ) -> Self {
        Self {
            git,
            fs,
            config,
            root_dir,
            options: CloneOptions::default(),
        }
    }

    /// Options passed to every clone this coordinator starts.
    pub fn with_options(mut self, options: CloneOptions) -> Self {
        self.options = options;
        self
    }

    /// Materialize the node at `path`. Non-fatal problems are appended to
    /// `warnings`.
    pub fn ensure_cloned(
        &self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
        warnings: &mut Vec<String>,
    ) -> Result<CloneOutcome> {
        let node = tree.get_node(path)?.clone();
        if !node.is_repository() {
            return Err(Error::InvalidOperation {
                message: format!("{} is not a repository node", path),
            });
        }

        let target = node_dir(tree, self.root_dir, path)?;
        let outcome = if self.fs.exists(&target.join(".git")) {
            self.check_existing_checkout(&target, &node.repository)?;
            info!("{} already present at {}", path, target.display());
            CloneOutcome::AlreadyPresent
        } else {
            self.prepare_target(&target)?;
            info!("cloning {} into {}", node.repository, target.display());
            self.git
                .clone_repo(&node.repository, &target, &self.options)?;
            CloneOutcome::Cloned
        };

        let mut updated = node;
        updated.is_cloned = true;
        tree.update_node(path, updated)?;

        let mut loader = TreeLoader::new(self.fs, self.config, self.root_dir);
        if let Err(e) = loader.expand_repository(tree, path) {
            warnings.push(format!("{}: nested document not loaded: {}", path, e));
        }
        warnings.extend(loader.into_warnings());

        if outcome == CloneOutcome::Cloned {
            if let Some(owner) = path.parent() {
                if let Err(e) = persist_level(tree, self.config, &owner) {
                    let message = format!("{}: clone state not saved: {}", path, e);
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
        }

        Ok(outcome)
    }

    fn check_existing_checkout(&self, target: &Path, expected: &str) -> Result<()> {
        match self.git.remote_url(target, "origin") {
            Ok(Some(actual)) if !same_remote(&actual, expected) => Err(Error::CloneConflict {
                path: target.to_path_buf(),
                message: format!(
                    "existing checkout points at {} instead of {}",
                    actual, expected
                ),
            }),
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("cannot read origin of {}: {}", target.display(), e);
                Ok(())
            }
        }
    }

    fn prepare_target(&self, target: &Path) -> Result<()> {
        if self.fs.exists(target) {
            let stat = self.fs.stat(target)?;
            if !stat.is_dir {
                return Err(Error::CloneConflict {
                    path: target.to_path_buf(),
                    message: "a file is in the way".to_string(),
                });
            }
            if !self.fs.is_empty_dir(target)? {
                return Err(Error::CloneConflict {
                    path: target.to_path_buf(),
                    message: "directory is not empty and is not a git checkout".to_string(),
                });
            }
            return Ok(());
        }

        let parent: PathBuf = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root_dir.to_path_buf());
        self.fs.mkdir_all(&parent)
    }
}

/// Compare remote URLs, ignoring a trailing slash or `.git`.
fn same_remote(a: &str, b: &str) -> bool {
    fn normalize(url: &str) -> &str {
        let url = url.trim().trim_end_matches('/');
        url.strip_suffix(".git").unwrap_or(url)
    }
    normalize(a) == normalize(b)
}
