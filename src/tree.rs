//! # Tree Store
//!
//! The in-memory arena of workspace nodes, addressed by [`TreePath`].
//!
//! ## Key Components
//!
//! - **`Node`**: one repository or grouping node, with its clone state and
//!   the directory convention of the level it owns.
//! - **`TreeProvider`**: node CRUD plus the current-node pointer. The engine,
//!   the resolver and the layout helpers only depend on this trait.
//! - **`TreeStore`**: the `BTreeMap`-backed implementation. Iteration order is
//!   deterministic; children keep their insertion order.
//!
//! Structural fields (`path`, `name`, `children`) are owned by the store:
//! [`TreeProvider::add_node`] derives them and [`TreeProvider::update_node`]
//! never changes them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{FetchMode, NodeDefinition};
use crate::defaults::DEFAULT_REPOS_DIR;
use crate::error::{Error, Result};
use crate::path::{validate_segment, TreePath};

/// One entry of the workspace tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Segment name, unique among siblings (empty for the root)
    pub name: String,
    /// Canonical absolute path, always `parent.path` + `/` + `name`
    pub path: TreePath,
    /// Remote URL, empty for the root and for config-reference nodes
    pub repository: String,
    /// The `file:` reference as written in the declaring document
    pub config_file: Option<String>,
    /// Declared fetch mode
    pub fetch: FetchMode,
    /// Effective laziness after resolving `auto`
    pub is_lazy: bool,
    /// Whether `<node dir>/.git` exists
    pub is_cloned: bool,
    /// Cached dirty flag, display only
    pub has_changes: bool,
    /// Child names in insertion order
    pub children: Vec<String>,
    /// Child-area directory name of the level this node owns
    pub repos_dir: String,
    /// The document that defines this node's children
    pub document: Option<PathBuf>,
}

impl Node {
    /// The workspace root, defined by `document`.
    pub fn root(document: PathBuf, repos_dir: &str) -> Self {
        Self {
            name: String::new(),
            path: TreePath::root(),
            repository: String::new(),
            config_file: None,
            fetch: FetchMode::Eager,
            is_lazy: false,
            is_cloned: false,
            has_changes: false,
            children: Vec::new(),
            repos_dir: repos_dir.to_string(),
            document: Some(document),
        }
    }

    pub fn repository(name: &str, url: &str, fetch: FetchMode) -> Self {
        Self {
            name: name.to_string(),
            path: TreePath::root(),
            repository: url.to_string(),
            config_file: None,
            fetch,
            is_lazy: fetch.is_lazy_for(name),
            is_cloned: false,
            has_changes: false,
            children: Vec::new(),
            repos_dir: DEFAULT_REPOS_DIR.to_string(),
            document: None,
        }
    }

    pub fn reference(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            path: TreePath::root(),
            repository: String::new(),
            config_file: Some(file.to_string()),
            fetch: FetchMode::Auto,
            is_lazy: false,
            is_cloned: false,
            has_changes: false,
            children: Vec::new(),
            repos_dir: DEFAULT_REPOS_DIR.to_string(),
            document: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    pub fn is_config_reference(&self) -> bool {
        self.config_file.is_some()
    }

    /// True for nodes backed by a git repository.
    pub fn is_repository(&self) -> bool {
        !self.repository.is_empty()
    }

    /// A lazy node that has not been materialized yet.
    pub fn is_unfetched(&self) -> bool {
        self.is_repository() && self.is_lazy && !self.is_cloned
    }

    /// The `nodes:` entry that declares this node in its parent's document.
    pub fn definition(&self) -> NodeDefinition {
        match &self.config_file {
            Some(file) => NodeDefinition::reference(&self.name, file),
            None => NodeDefinition::repository(&self.name, &self.repository, self.fetch),
        }
    }
}

/// Node CRUD over a tree addressed by `TreePath`
pub trait TreeProvider: Send + Sync {
    fn get_node(&self, path: &TreePath) -> Result<&Node>;

    /// The node commands act on when no path is given.
    fn get_current(&self) -> TreePath;

    fn set_current(&mut self, path: &TreePath) -> Result<()>;

    /// Insert `node` under `parent` and return its path.
    ///
    /// Fails with `DuplicateNode` when the parent already has a child with
    /// that name.
    fn add_node(&mut self, parent: &TreePath, node: Node) -> Result<TreePath>;

    /// Detach `path` and its whole subtree. Returns the removed nodes in
    /// pre-order, starting with `path` itself.
    fn remove_node(&mut self, path: &TreePath) -> Result<Vec<Node>>;

    /// Replace the data fields of the node at `path`.
    fn update_node(&mut self, path: &TreePath, node: Node) -> Result<()>;

    /// Children of `path`, in insertion order
    fn list_children(&self, path: &TreePath) -> Result<Vec<&Node>>;
}

/// The default `TreeProvider`
#[derive(Debug, Clone)]
pub struct TreeStore {
    nodes: BTreeMap<TreePath, Node>,
    current: TreePath,
}

impl TreeStore {
    /// A store holding only `root`.
    pub fn new(mut root: Node) -> Self {
        root.path = TreePath::root();
        root.children.clear();
        let mut nodes = BTreeMap::new();
        nodes.insert(TreePath::root(), root);
        Self {
            nodes,
            current: TreePath::root(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &TreePath) -> bool {
        self.nodes.contains_key(path)
    }

    /// Paths of `start` and its descendants in pre-order, children in
    /// insertion order.
    pub fn walk(&self, start: &TreePath) -> Result<Vec<TreePath>> {
        let mut out = Vec::new();
        walk_from(self, start, &mut out)?;
        Ok(out)
    }
}

/// Pre-order paths below `start` for any provider.
pub fn walk_from(
    tree: &dyn TreeProvider,
    start: &TreePath,
    out: &mut Vec<TreePath>,
) -> Result<()> {
    let node = tree.get_node(start)?;
    out.push(start.clone());
    for child in &node.children {
        walk_from(tree, &start.join(child)?, out)?;
    }
    Ok(())
}

impl TreeProvider for TreeStore {
    fn get_node(&self, path: &TreePath) -> Result<&Node> {
        self.nodes
            .get(path)
            .ok_or_else(|| Error::not_found(path.to_string()))
    }

    fn get_current(&self) -> TreePath {
        self.current.clone()
    }

    fn set_current(&mut self, path: &TreePath) -> Result<()> {
        if !self.nodes.contains_key(path) {
            return Err(Error::not_found(path.to_string()));
        }
        self.current = path.clone();
        Ok(())
    }

    fn add_node(&mut self, parent: &TreePath, mut node: Node) -> Result<TreePath> {
        validate_segment(&node.name)?;
        let path = parent.join(&node.name)?;
        if self.nodes.contains_key(&path) {
            return Err(Error::DuplicateNode {
                path: path.to_string(),
            });
        }

        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| Error::not_found(parent.to_string()))?;
        parent_node.children.push(node.name.clone());

        node.path = path.clone();
        node.children.clear();
        self.nodes.insert(path.clone(), node);
        Ok(path)
    }

    fn remove_node(&mut self, path: &TreePath) -> Result<Vec<Node>> {
        let parent = path.parent().ok_or_else(|| Error::InvalidOperation {
            message: "the workspace root cannot be removed".to_string(),
        })?;
        let subtree = self.walk(path)?;

        let mut removed = Vec::with_capacity(subtree.len());
        for entry in &subtree {
            if let Some(node) = self.nodes.remove(entry) {
                removed.push(node);
            }
        }

        if let (Some(parent_node), Some(name)) = (self.nodes.get_mut(&parent), path.name()) {
            parent_node.children.retain(|child| child != name);
        }
        if self.current.starts_with(path) {
            self.current = parent;
        }
        Ok(removed)
    }

    fn update_node(&mut self, path: &TreePath, mut node: Node) -> Result<()> {
        let existing = self
            .nodes
            .get_mut(path)
            .ok_or_else(|| Error::not_found(path.to_string()))?;
        node.path = existing.path.clone();
        node.name = existing.name.clone();
        node.children = std::mem::take(&mut existing.children);
        *existing = node;
        Ok(())
    }

    fn list_children(&self, path: &TreePath) -> Result<Vec<&Node>> {
        let node = self.get_node(path)?;
        node.children
            .iter()
            .map(|child| self.get_node(&path.join(child)?))
            .collect()
    }
}
