//! # Git Provider
//!
//! This module defines [`GitProvider`], the single capability set the core
//! uses for every git interaction, together with its option structs.
//!
//! ## Design
//!
//! The traversal engine and the lazy-clone coordinator only ever talk to a
//! `&dyn GitProvider`. In the application that is [`SystemGit`], which wraps
//! the functions in [`crate::git`]. Tests substitute a spy implementation that
//! records calls and fails on demand, so traversal order and partial-failure
//! handling can be checked without running git.

use std::path::Path;

use crate::error::Result;
use crate::git::{self, GitStatus};

/// Options for [`GitProvider::clone_repo`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Shallow clone depth
    pub depth: Option<u32>,
}

/// Options for [`GitProvider::pull`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullOptions {
    pub force: bool,
    /// Rebase local commits instead of merging
    pub rebase: bool,
}

/// Options for [`GitProvider::push`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub force: bool,
    /// Push `HEAD` to `origin` and track it
    pub set_upstream: bool,
}

/// Options for [`GitProvider::fetch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub prune: bool,
}

/// Every git operation the core needs, scoped to a working-copy path
pub trait GitProvider: Send + Sync {
    fn clone_repo(&self, url: &str, target_dir: &Path, opts: &CloneOptions) -> Result<()>;

    fn pull(&self, dir: &Path, opts: &PullOptions) -> Result<()>;

    fn push(&self, dir: &Path, opts: &PushOptions) -> Result<()>;

    /// Commit what is staged
    fn commit(&self, dir: &Path, message: &str) -> Result<()>;

    fn status(&self, dir: &Path) -> Result<GitStatus>;

    fn fetch(&self, dir: &Path, opts: &FetchOptions) -> Result<()>;

    /// Stage `pathspecs`, or every change when empty
    fn add(&self, dir: &Path, pathspecs: &[String]) -> Result<()>;

    fn checkout(&self, dir: &Path, branch: &str, create: bool) -> Result<()>;

    /// URL of `remote`, `None` when it is not configured
    fn remote_url(&self, dir: &Path, remote: &str) -> Result<Option<String>>;
}

/// The default implementation of `GitProvider`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl GitProvider for SystemGit {
    fn clone_repo(&self, url: &str, target_dir: &Path, opts: &CloneOptions) -> Result<()> {
        git::clone(url, target_dir, opts.depth)
    }

    fn pull(&self, dir: &Path, opts: &PullOptions) -> Result<()> {
        git::pull(dir, opts.force, opts.rebase)
    }

    fn push(&self, dir: &Path, opts: &PushOptions) -> Result<()> {
        git::push(dir, opts.force, opts.set_upstream)
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<()> {
        git::commit(dir, message)
    }

    fn status(&self, dir: &Path) -> Result<GitStatus> {
        git::status(dir)
    }

    fn fetch(&self, dir: &Path, opts: &FetchOptions) -> Result<()> {
        git::fetch(dir, opts.prune)
    }

    fn add(&self, dir: &Path, pathspecs: &[String]) -> Result<()> {
        git::add(dir, pathspecs)
    }

    fn checkout(&self, dir: &Path, branch: &str, create: bool) -> Result<()> {
        git::checkout(dir, branch, create)
    }

    fn remote_url(&self, dir: &Path, remote: &str) -> Result<Option<String>> {
        git::remote_url(dir, remote)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{calls_of, SpyGit};
    use super::*;
    use std::sync::Arc;

    use crate::filesystem::{FileSystemProvider, MemoryFS};

    #[test]
    fn test_spy_records_calls_in_order() {
        let spy = SpyGit::new();
        let calls = spy.calls_handle();
        let provider: Box<dyn GitProvider> = Box::new(spy);

        provider.pull(Path::new("/ws/a"), &PullOptions::default()).unwrap();
        provider.push(Path::new("/ws/b"), &PushOptions::default()).unwrap();
        provider.pull(Path::new("/ws/c"), &PullOptions::default()).unwrap();

        assert_eq!(calls.lock().unwrap().len(), 3);
        assert_eq!(
            calls_of(&calls, "pull"),
            vec![Path::new("/ws/a").to_path_buf(), Path::new("/ws/c").to_path_buf()]
        );
    }

    #[test]
    fn test_spy_failure_is_git_error() {
        let spy = SpyGit::new();
        spy.fail_on("/ws/a");
        let err = spy.pull(Path::new("/ws/a"), &PullOptions::default()).unwrap_err();
        assert!(err.to_string().contains("simulated failure"));
        assert!(spy.pull(Path::new("/ws/b"), &PullOptions::default()).is_ok());
    }

    #[test]
    fn test_spy_clone_materializes_git_dir() {
        let fs = Arc::new(MemoryFS::new());
        let spy = SpyGit::with_fs(Arc::clone(&fs));
        spy.clone_repo("https://x/a.git", Path::new("/ws/nodes/a"), &CloneOptions::default())
            .unwrap();
        assert!(fs.exists(Path::new("/ws/nodes/a/.git")));
    }

    #[test]
    fn test_spy_status_defaults_to_clean() {
        let spy = SpyGit::new();
        let mut dirty = GitStatus::default();
        dirty.has_modified = true;
        spy.set_status("/ws/dirty", dirty.clone());

        assert!(spy.status(Path::new("/ws/clean")).unwrap().is_clean);
        assert_eq!(spy.status(Path::new("/ws/dirty")).unwrap(), dirty);
    }
}
