//! # Workspace Manager
//!
//! The façade the CLI talks to. A [`Manager`] owns the loaded tree and the
//! collaborators injected through [`ManagerOptions`], and exposes the
//! operations commands need:
//!
//! - resolution of user input to tree paths
//! - recursive git operations (`clone_repos`, `pull_node`, `status_node`, ...)
//! - structural mutations (`add`, `remove`) with persistence
//!
//! ## Error policy
//!
//! Operations return `Err` for structural problems only: an uninitialized
//! workspace or an input that resolves to no node. Per-node git failures are
//! reported in the [`OperationSummary`]. The exception is a non-recursive
//! operation on a single repository, whose git error is returned directly.
//!
//! Persistence and cleanup failures during `add`, `remove` and lazy clones
//! never fail the operation. They are logged and returned as warnings.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::{self, ConfigProvider, FetchMode, WorkspaceConfig, YamlConfigProvider};
use crate::defaults::DEFAULT_CONFIG_FILENAME;
use crate::engine::{
    CancellationToken, Engine, GitOperation, NoopObserver, OperationSummary, TraversalObserver,
    TraversalOptions,
};
use crate::error::{Error, Result};
use crate::filesystem::{FileSystemProvider, OsFileSystem};
use crate::layout;
use crate::lazy::LazyCloner;
use crate::loader::{persist_level, TreeLoader};
use crate::path::{validate_segment, TreePath};
use crate::repository::{GitProvider, SystemGit};
use crate::resolver::{find_workspace_root, PathResolver};
use crate::tree::{Node, TreeProvider, TreeStore};

/// Collaborators and starting point of a manager
pub struct ManagerOptions {
    /// Explicit workspace root, skipping discovery
    pub workspace: Option<PathBuf>,
    /// Working directory used for discovery and for empty-path input
    pub cwd: PathBuf,
    pub git: Box<dyn GitProvider>,
    pub fs: Box<dyn FileSystemProvider>,
    pub config: Box<dyn ConfigProvider>,
    pub observer: Box<dyn TraversalObserver>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            workspace: None,
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            git: Box::new(SystemGit),
            fs: Box::new(OsFileSystem),
            config: Box::new(YamlConfigProvider),
            observer: Box::new(NoopObserver),
        }
    }
}

/// Options for [`Manager::add`]
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Node name, derived from the URL when `None`
    pub name: Option<String>,
    pub fetch: FetchMode,
    /// Parent node input, the current node when `None`
    pub parent: Option<String>,
}

/// Result of [`Manager::add`]
#[derive(Debug)]
pub struct AddOutcome {
    pub path: TreePath,
    /// Whether the working copy exists after the add
    pub cloned: bool,
    pub warnings: Vec<String>,
}

/// Result of [`Manager::remove`]
#[derive(Debug)]
pub struct RemoveOutcome {
    pub path: TreePath,
    /// Every detached node, in pre-order
    pub removed: Vec<TreePath>,
    pub warnings: Vec<String>,
}

pub struct Manager {
    options: ManagerOptions,
    root_dir: Option<PathBuf>,
    tree: Option<TreeStore>,
    load_warnings: Vec<String>,
    cancel: CancellationToken,
}

impl Manager {
    pub fn new(options: ManagerOptions) -> Self {
        Self {
            options,
            root_dir: None,
            tree: None,
            load_warnings: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Discover the workspace, load the tree and select the current node.
    pub fn initialize(&mut self) -> Result<()> {
        let fs = self.options.fs.as_ref();
        let config = self.options.config.as_ref();

        let root_dir = match &self.options.workspace {
            Some(dir) => {
                let dir = fs.canonicalize(dir);
                if config.find_document(&dir).is_none() {
                    return Err(Error::NotInitialized {
                        message: format!("no grove.yaml in {}", dir.display()),
                    });
                }
                dir
            }
            None => find_workspace_root(&self.options.cwd, fs, config)?,
        };

        let loaded = TreeLoader::new(fs, config, &root_dir).load()?;
        let mut tree = loaded.tree;

        let current = PathResolver::new(&tree, fs, &root_dir)?
            .resolve_filesystem(&self.options.cwd)
            .unwrap_or_else(|_| TreePath::root());
        tree.set_current(&current)?;

        info!("workspace {} ({} nodes)", root_dir.display(), tree.len());
        self.root_dir = Some(root_dir);
        self.tree = Some(tree);
        self.load_warnings = loaded.warnings;
        Ok(())
    }

    /// Write an empty tree definition into `dir`.
    pub fn init_workspace(
        dir: &Path,
        name: &str,
        repos_dir: Option<&str>,
        config: &dyn ConfigProvider,
    ) -> Result<PathBuf> {
        if let Some(existing) = config.find_document(dir) {
            return Err(Error::InvalidOperation {
                message: format!("{} already exists", existing.display()),
            });
        }
        let mut document = WorkspaceConfig::named(name);
        if let Some(repos_dir) = repos_dir {
            validate_segment(repos_dir)?;
            document.workspace.repos_dir = repos_dir.to_string();
        }
        let path = dir.join(DEFAULT_CONFIG_FILENAME);
        config.save(&path, &document)?;
        Ok(path)
    }

    pub fn is_initialized(&self) -> bool {
        self.tree.is_some()
    }

    pub fn tree(&self) -> Result<&TreeStore> {
        self.tree.as_ref().ok_or_else(not_initialized)
    }

    pub fn root_dir(&self) -> Result<&Path> {
        self.root_dir.as_deref().ok_or_else(not_initialized)
    }

    /// Warnings collected while loading the tree
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// Token that stops running traversals between two nodes
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn current(&self) -> Result<TreePath> {
        Ok(self.tree()?.get_current())
    }

    /// Resolve user input to a tree path.
    pub fn resolve(&self, input: &str) -> Result<TreePath> {
        let tree = self.tree()?;
        let root_dir = self.root_dir()?;
        PathResolver::new(tree, self.options.fs.as_ref(), root_dir)?
            .resolve(input, &self.options.cwd)
    }

    pub fn get_node(&self, input: &str) -> Result<&Node> {
        let path = self.resolve(input)?;
        self.tree()?.get_node(&path)
    }

    /// Filesystem directory of the node at `path`.
    pub fn node_dir(&self, path: &TreePath) -> Result<PathBuf> {
        layout::node_dir(self.tree()?, self.root_dir()?, path)
    }

    pub fn clone_repos(
        &mut self,
        path: &str,
        recursive: bool,
        include_lazy: bool,
    ) -> Result<OperationSummary> {
        let options = self.traversal(recursive, include_lazy);
        self.run(path, &GitOperation::Clone, &options)
    }

    pub fn status_node(&mut self, path: &str, recursive: bool) -> Result<OperationSummary> {
        let options = self.traversal(recursive, false);
        self.run(path, &GitOperation::Status, &options)
    }

    pub fn pull_node(&mut self, path: &str, recursive: bool, force: bool) -> Result<OperationSummary> {
        self.pull_node_with_options(path, recursive, force, false)
    }

    pub fn pull_node_with_options(
        &mut self,
        path: &str,
        recursive: bool,
        force: bool,
        include_lazy: bool,
    ) -> Result<OperationSummary> {
        let options = self.traversal(recursive, include_lazy);
        let operation = GitOperation::Pull {
            force,
            rebase: false,
        };
        self.run(path, &operation, &options)
    }

    pub fn push_node(&mut self, path: &str, recursive: bool, force: bool) -> Result<OperationSummary> {
        let options = self.traversal(recursive, false);
        let operation = GitOperation::Push {
            force,
            set_upstream: false,
        };
        self.run(path, &operation, &options)
    }

    pub fn commit_node(
        &mut self,
        path: &str,
        message: &str,
        recursive: bool,
    ) -> Result<OperationSummary> {
        let options = self.traversal(recursive, false);
        let operation = GitOperation::Commit {
            message: message.to_string(),
        };
        self.run(path, &operation, &options)
    }

    pub fn fetch_node(&mut self, path: &str, recursive: bool, prune: bool) -> Result<OperationSummary> {
        let options = self.traversal(recursive, false);
        self.run(path, &GitOperation::Fetch { prune }, &options)
    }

    pub fn checkout_node(
        &mut self,
        path: &str,
        branch: &str,
        create: bool,
        recursive: bool,
    ) -> Result<OperationSummary> {
        let options = self.traversal(recursive, false);
        let operation = GitOperation::Checkout {
            branch: branch.to_string(),
            create,
        };
        self.run(path, &operation, &options)
    }

    /// Resolve `input` and run `operation` from there.
    pub fn run(
        &mut self,
        input: &str,
        operation: &GitOperation,
        options: &TraversalOptions,
    ) -> Result<OperationSummary> {
        let start = self.resolve(input)?;
        let root_dir = self.root_dir()?.to_path_buf();
        let tree = self.tree.as_mut().ok_or_else(not_initialized)?;
        let start_is_repository = tree.get_node(&start)?.is_repository();

        let engine = Engine::new(
            self.options.git.as_ref(),
            self.options.fs.as_ref(),
            self.options.config.as_ref(),
            &root_dir,
            self.options.observer.as_ref(),
        );
        let mut summary = engine.run(tree, &start, operation, options)?;

        if !options.recursive && start_is_repository {
            if let Some(failure) = summary.failures.pop() {
                return Err(failure.error);
            }
        }
        Ok(summary)
    }

    /// Add a repository node under the current node or `options.parent`.
    ///
    /// An eager node is cloned right away. If that clone fails the node stays
    /// in the tree and the clone error is returned.
    pub fn add(&mut self, url: &str, options: AddOptions) -> Result<AddOutcome> {
        let parent = match options.parent.as_deref() {
            Some(input) => self.resolve(input)?,
            None => self.current()?,
        };
        let root_dir = self.root_dir()?.to_path_buf();
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidOperation {
                message: "repository URL is empty".to_string(),
            });
        }

        let name = match options.name {
            Some(name) => name,
            None => config::name_from_url(url).ok_or_else(|| Error::InvalidName {
                name: url.to_string(),
                reason: "cannot derive a node name from the URL, pass --name".to_string(),
            })?,
        };
        validate_segment(&name)?;

        let fs = self.options.fs.as_ref();
        let config = self.options.config.as_ref();
        let tree = self.tree.as_mut().ok_or_else(not_initialized)?;

        let parent_node = tree.get_node(&parent)?.clone();
        if parent_node.is_repository() && !parent_node.is_cloned {
            return Err(Error::InvalidOperation {
                message: format!("{} is not cloned yet, run 'grove clone {}' first", parent, parent),
            });
        }

        let mut node = Node::repository(&name, url, options.fetch);
        let path = tree.add_node(&parent, node.clone())?;
        let target = layout::node_dir(tree, &root_dir, &path)?;
        node.is_cloned = fs.exists(&target.join(".git"));
        tree.update_node(&path, node.clone())?;

        if parent_node.document.is_none() {
            // First child of a plain repository: it becomes a level
            let parent_dir = layout::node_dir(tree, &root_dir, &parent)?;
            let mut level = parent_node.clone();
            level.document = Some(parent_dir.join(DEFAULT_CONFIG_FILENAME));
            tree.update_node(&parent, level)?;
        }

        let mut warnings = Vec::new();
        if let Err(e) = persist_level(tree, config, &parent) {
            let message = format!("{} added but not saved: {}", path, e);
            warn!("{}", message);
            warnings.push(message);
        }

        let mut cloned = node.is_cloned;
        if !node.is_lazy && !cloned {
            let cloner = LazyCloner::new(self.options.git.as_ref(), fs, config, &root_dir);
            cloner.ensure_cloned(tree, &path, &mut warnings)?;
            cloned = true;
        }

        info!("added {} ({})", path, url);
        Ok(AddOutcome {
            path,
            cloned,
            warnings,
        })
    }

    /// Detach a node and its subtree, delete its directory and save.
    pub fn remove(&mut self, input: &str) -> Result<RemoveOutcome> {
        let path = self.resolve(input)?;
        let Some(parent) = path.parent() else {
            return Err(Error::InvalidOperation {
                message: "the workspace root cannot be removed".to_string(),
            });
        };
        let dir = self.node_dir(&path)?;

        let fs = self.options.fs.as_ref();
        let config = self.options.config.as_ref();
        let tree = self.tree.as_mut().ok_or_else(not_initialized)?;

        let removed: Vec<TreePath> = tree
            .remove_node(&path)?
            .into_iter()
            .map(|node| node.path)
            .collect();

        let mut warnings = Vec::new();
        if fs.exists(&dir) {
            if let Err(e) = fs.remove_all(&dir) {
                let message = format!("could not delete {}: {}", dir.display(), e);
                warn!("{}", message);
                warnings.push(message);
            }
        }
        if let Err(e) = persist_level(tree, config, &parent) {
            let message = format!("{} removed but not saved: {}", path, e);
            warn!("{}", message);
            warnings.push(message);
        }

        info!("removed {} ({} nodes)", path, removed.len());
        Ok(RemoveOutcome {
            path,
            removed,
            warnings,
        })
    }

    /// Traversal options wired to this manager's cancellation token.
    pub fn traversal(&self, recursive: bool, include_lazy: bool) -> TraversalOptions {
        TraversalOptions {
            recursive,
            include_lazy,
            cancel: self.cancel.clone(),
            ..TraversalOptions::default()
        }
    }
}

fn not_initialized() -> Error {
    Error::NotInitialized {
        message: "no workspace loaded".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryConfigProvider, NodeDefinition};
    use crate::filesystem::MemoryFS;
    use crate::repository::testing::{calls_of, Call, SpyGit};
    use std::sync::{Arc, Mutex};

    struct Harness {
        manager: Manager,
        fs: Arc<MemoryFS>,
        config: Arc<MemoryConfigProvider>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    /// `/team` (cloned) -> `service1` (cloned), `service2` (lazy, uncloned)
    fn harness_with(cwd: &str, configure: impl FnOnce(&SpyGit)) -> Harness {
        let fs = Arc::new(MemoryFS::new());
        let config = Arc::new(MemoryConfigProvider::new());

        let mut root = WorkspaceConfig::named("acme");
        root.nodes.push(NodeDefinition::repository(
            "team",
            "https://x/team.git",
            FetchMode::Eager,
        ));
        config.insert("/ws/grove.yaml", root);

        let mut team = WorkspaceConfig::named("team");
        team.nodes.push(NodeDefinition::repository(
            "service1",
            "https://x/service1.git",
            FetchMode::Eager,
        ));
        team.nodes.push(NodeDefinition::repository(
            "service2",
            "https://x/service2.git",
            FetchMode::Lazy,
        ));
        config.insert("/ws/nodes/team/grove.yaml", team);

        fs.add_git_dir("/ws/nodes/team").unwrap();
        fs.add_git_dir("/ws/nodes/team/nodes/service1").unwrap();
        fs.mkdir_all(Path::new(cwd)).unwrap();

        let spy = SpyGit::with_fs(Arc::clone(&fs));
        configure(&spy);
        let calls = spy.calls_handle();

        let mut manager = Manager::new(ManagerOptions {
            workspace: None,
            cwd: PathBuf::from(cwd),
            git: Box::new(spy),
            fs: Box::new(Arc::clone(&fs)),
            config: Box::new(Arc::clone(&config)),
            observer: Box::new(NoopObserver),
        });
        manager.initialize().unwrap();

        Harness {
            manager,
            fs,
            config,
            calls,
        }
    }

    fn harness() -> Harness {
        harness_with("/ws", |_| {})
    }

    fn dir(rel: &str) -> PathBuf {
        Path::new("/ws").join(rel)
    }

    #[test]
    fn test_uninitialized_manager_fails_hard() {
        let mut manager = Manager::new(ManagerOptions {
            fs: Box::new(MemoryFS::new()),
            config: Box::new(MemoryConfigProvider::new()),
            git: Box::new(SpyGit::new()),
            ..ManagerOptions::default()
        });
        assert!(matches!(
            manager.pull_node("/team", true, false),
            Err(Error::NotInitialized { .. })
        ));
        assert!(matches!(manager.resolve("/"), Err(Error::NotInitialized { .. })));
        assert!(matches!(manager.initialize(), Err(Error::NotInitialized { .. })));
    }

    #[test]
    fn test_pull_scenario_skips_lazy_service() {
        let mut h = harness();
        let summary = h.manager.pull_node("/team", true, false).unwrap();
        assert_eq!(
            calls_of(&h.calls, "pull"),
            vec![dir("nodes/team"), dir("nodes/team/nodes/service1")]
        );
        assert_eq!(summary.summary_line(), "2 succeeded, 0 failed");
    }

    #[test]
    fn test_clone_scenario_clones_lazy_service_once() {
        let mut h = harness();
        h.manager.clone_repos("/team", true, true).unwrap();
        assert_eq!(
            calls_of(&h.calls, "clone"),
            vec![dir("nodes/team/nodes/service2")]
        );
        let node = h.manager.get_node("/team/service2").unwrap();
        assert!(node.is_cloned);
        assert!(h.fs.exists(&dir("nodes/team/nodes/service2/.git")));
    }

    #[test]
    fn test_unknown_path_is_a_hard_error() {
        let mut h = harness();
        assert!(matches!(
            h.manager.status_node("/team/nope", true),
            Err(Error::NodeNotFound { .. })
        ));
        assert!(h.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_single_node_failure_is_returned_directly() {
        let mut h = harness_with("/ws", |spy| spy.fail_on("/ws/nodes/team/nodes/service1"));
        let err = h.manager.push_node("/team/service1", false, false).unwrap_err();
        assert!(matches!(err, Error::GitCommand { .. }));

        let summary = h.manager.push_node("/team", true, false).unwrap();
        assert_eq!(summary.summary_line(), "1 succeeded, 1 failed");
        assert_eq!(summary.failures[0].name, "service1");
    }

    #[test]
    fn test_current_node_comes_from_cwd() {
        let mut h = harness_with("/ws/nodes/team/nodes/service1/src", |_| {});
        assert_eq!(h.manager.current().unwrap().to_string(), "/team/service1");

        let summary = h.manager.status_node("", false).unwrap();
        assert_eq!(summary.statuses.len(), 1);
        assert_eq!(summary.statuses[0].0, TreePath::parse("/team/service1"));
        assert_eq!(h.manager.resolve("../service2").unwrap().to_string(), "/team/service2");
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut h = harness();
        let outcome = h
            .manager
            .add(
                "https://x/web.git",
                AddOptions {
                    fetch: FetchMode::Lazy,
                    parent: Some("/team".to_string()),
                    ..AddOptions::default()
                },
            )
            .unwrap();
        assert_eq!(outcome.path.to_string(), "/team/web");
        assert!(!outcome.cloned);

        let node = h.manager.get_node("/team/web").unwrap();
        assert_eq!(node.name, "web");
        assert_eq!(node.repository, "https://x/web.git");
        let saved = h.config.get("/ws/nodes/team/grove.yaml").unwrap();
        assert!(saved.find("web").is_some());
        assert!(calls_of(&h.calls, "clone").is_empty());

        let removed = h.manager.remove("/team/web").unwrap();
        assert_eq!(removed.removed, vec![TreePath::parse("/team/web")]);
        assert!(matches!(
            h.manager.get_node("/team/web"),
            Err(Error::NodeNotFound { .. })
        ));
        let saved = h.config.get("/ws/nodes/team/grove.yaml").unwrap();
        assert!(saved.find("web").is_none());
    }

    #[test]
    fn test_add_eager_clones_immediately() {
        let mut h = harness();
        let outcome = h
            .manager
            .add(
                "git@github.com:acme/tools.git",
                AddOptions {
                    fetch: FetchMode::Eager,
                    ..AddOptions::default()
                },
            )
            .unwrap();
        assert_eq!(outcome.path.to_string(), "/tools");
        assert!(outcome.cloned);
        assert_eq!(calls_of(&h.calls, "clone"), vec![dir("nodes/tools")]);
        assert!(h.manager.get_node("/tools").unwrap().is_cloned);
    }

    #[test]
    fn test_add_eager_clone_failure_keeps_node() {
        let mut h = harness_with("/ws", |spy| spy.fail_on("/ws/nodes/tools"));
        let err = h
            .manager
            .add(
                "https://x/tools.git",
                AddOptions {
                    fetch: FetchMode::Eager,
                    ..AddOptions::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::GitClone { .. }));
        let node = h.manager.get_node("/tools").unwrap();
        assert!(!node.is_cloned);
        assert!(h.config.get("/ws/grove.yaml").unwrap().find("tools").is_some());
    }

    #[test]
    fn test_add_rejects_duplicates_and_uncloned_parents() {
        let mut h = harness();
        let err = h
            .manager
            .add(
                "https://x/service1.git",
                AddOptions {
                    parent: Some("/team".to_string()),
                    ..AddOptions::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateNode { .. }));

        let err = h
            .manager
            .add(
                "https://x/lib.git",
                AddOptions {
                    parent: Some("/team/service2".to_string()),
                    ..AddOptions::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation { .. }));

        let err = h
            .manager
            .add(
                "https://x/lib.git",
                AddOptions {
                    name: Some("a/b".to_string()),
                    ..AddOptions::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_add_under_plain_repository_creates_its_document() {
        let mut h = harness();
        h.manager
            .add(
                "https://x/plugin.git",
                AddOptions {
                    fetch: FetchMode::Lazy,
                    parent: Some("/team/service1".to_string()),
                    ..AddOptions::default()
                },
            )
            .unwrap();
        let doc = h
            .config
            .get("/ws/nodes/team/nodes/service1/grove.yaml")
            .unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.workspace.name, "service1");
    }

    #[test]
    fn test_persistence_failures_are_warnings() {
        let mut h = harness();
        h.config.set_fail_saves(true);

        let outcome = h
            .manager
            .add(
                "https://x/web.git",
                AddOptions {
                    fetch: FetchMode::Lazy,
                    ..AddOptions::default()
                },
            )
            .unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(h.manager.get_node("/web").is_ok());

        h.fs.set_fail_removals(true);
        let removed = h.manager.remove("/team").unwrap();
        assert_eq!(removed.removed.len(), 3);
        assert_eq!(removed.warnings.len(), 2);
        assert!(h.manager.get_node("/team").is_err());
    }

    #[test]
    fn test_remove_deletes_directory_and_moves_current() {
        let mut h = harness_with("/ws/nodes/team/nodes/service1", |_| {});
        let removed = h.manager.remove("/team").unwrap();
        assert_eq!(removed.removed.len(), 3);
        assert!(removed.warnings.is_empty());
        assert!(!h.fs.exists(&dir("nodes/team")));
        assert_eq!(h.manager.current().unwrap(), TreePath::root());
        assert!(h.config.get("/ws/grove.yaml").unwrap().nodes.is_empty());
    }

    #[test]
    fn test_remove_root_is_rejected() {
        let mut h = harness();
        assert!(matches!(
            h.manager.remove("/"),
            Err(Error::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_persistence_warnings_are_logged() {
        testing_logger::setup();
        let mut h = harness();
        h.config.set_fail_saves(true);
        h.manager.remove("/team/service1").unwrap();

        testing_logger::validate(|captured_logs| {
            assert!(captured_logs
                .iter()
                .any(|log| log.level == log::Level::Warn && log.body.contains("not saved")));
        });
    }

    #[test]
    fn test_init_workspace_refuses_to_overwrite() {
        let config = MemoryConfigProvider::new();
        let path = Manager::init_workspace(Path::new("/new"), "fresh", Some("repos"), &config).unwrap();
        assert_eq!(path, PathBuf::from("/new/grove.yaml"));
        assert_eq!(config.get(&path).unwrap().workspace.repos_dir, "repos");

        assert!(Manager::init_workspace(Path::new("/new"), "fresh", None, &config).is_err());
    }
}
