//! # Tree Loader
//!
//! Builds a [`TreeStore`] from the workspace's root document and writes
//! levels back.
//!
//! Loading starts at the root document and follows two kinds of edges:
//!
//! - **Config references** (`file:` entries): the referenced document defines
//!   the node's children and its `repos_dir`. References are followed with
//!   cycle detection on canonical paths. A missing document yields a warning
//!   and a childless node.
//! - **Nested documents**: a cloned repository that carries its own
//!   `grove.yaml` becomes a level, and its entries join the tree below it.
//!
//! Clone state is detected from disk (`<node dir>/.git`), never stored.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::{resolve_reference, ConfigProvider, WorkspaceConfig, WorkspaceMeta};
use crate::error::{Error, Result};
use crate::filesystem::FileSystemProvider;
use crate::layout::node_dir;
use crate::path::TreePath;
use crate::tree::{Node, TreeProvider, TreeStore};

/// A freshly loaded tree and the non-fatal problems met on the way
#[derive(Debug)]
pub struct LoadedTree {
    pub tree: TreeStore,
    pub warnings: Vec<String>,
}

/// Reads tree-definition documents into a tree
pub struct TreeLoader<'a> {
    fs: &'a dyn FileSystemProvider,
    config: &'a dyn ConfigProvider,
    root_dir: PathBuf,
    warnings: Vec<String>,
}

impl<'a> TreeLoader<'a> {
    pub fn new(
        fs: &'a dyn FileSystemProvider,
        config: &'a dyn ConfigProvider,
        root_dir: &Path,
    ) -> Self {
        Self {
            fs,
            config,
            root_dir: root_dir.to_path_buf(),
            warnings: Vec::new(),
        }
    }

    /// Load the whole tree rooted at the workspace directory.
    pub fn load(mut self) -> Result<LoadedTree> {
        let document = self
            .config
            .find_document(&self.root_dir)
            .ok_or_else(|| Error::NotInitialized {
                message: format!("no tree definition in {}", self.root_dir.display()),
            })?;

        let mut tree = TreeStore::new(Node::root(document.clone(), ""));
        let root_dir = self.root_dir.clone();
        let mut stack = Vec::new();
        self.load_level(&mut tree, &TreePath::root(), &root_dir, &document, &mut stack)?;

        debug!("loaded {} nodes from {}", tree.len(), document.display());
        Ok(LoadedTree {
            tree,
            warnings: self.warnings,
        })
    }

    /// Attach the nested document of a cloned repository, if it has one.
    ///
    /// Returns `true` when a document was found and its entries were added.
    pub fn expand_repository(
        &mut self,
        tree: &mut dyn TreeProvider,
        path: &TreePath,
    ) -> Result<bool> {
        let dir = node_dir(tree, &self.root_dir, path)?;
        let Some(document) = self.config.find_document(&dir) else {
            return Ok(false);
        };

        let mut stack: Vec<PathBuf> = Vec::new();
        if let Some(parent) = path.parent() {
            for ancestor in parent.ancestors_inclusive() {
                if let Some(doc) = &tree.get_node(&ancestor)?.document {
                    stack.push(self.fs.canonicalize(doc));
                }
            }
        }

        self.load_level(tree, path, &dir, &document, &mut stack)?;
        Ok(true)
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn load_level(
        &mut self,
        tree: &mut dyn TreeProvider,
        owner: &TreePath,
        owner_dir: &Path,
        document: &Path,
        stack: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let canonical = self.fs.canonicalize(document);
        if let Some(start) = stack.iter().position(|seen| *seen == canonical) {
            let mut chain: Vec<String> = stack[start..]
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            chain.push(canonical.display().to_string());
            return Err(Error::CycleDetected {
                cycle: chain.join(" -> "),
            });
        }

        let doc = self.config.load(document)?;
        let repos_dir = doc.workspace.repos_dir.clone();

        let mut owner_node = tree.get_node(owner)?.clone();
        owner_node.repos_dir = repos_dir.clone();
        owner_node.document = Some(document.to_path_buf());
        tree.update_node(owner, owner_node)?;

        stack.push(canonical);
        let area = owner_dir.join(&repos_dir);
        for definition in &doc.nodes {
            let child_dir = area.join(&definition.name);

            if let Some(file) = &definition.file {
                let referenced = resolve_reference(document, file);
                let mut node = Node::reference(&definition.name, file);
                node.document = Some(referenced.clone());
                let path = tree.add_node(owner, node)?;

                if self.config.exists(&referenced) {
                    self.load_level(tree, &path, &child_dir, &referenced, stack)?;
                } else {
                    self.warn(format!(
                        "{}: referenced document {} not found",
                        path,
                        referenced.display()
                    ));
                }
            } else if let Some(url) = &definition.url {
                let mut node = Node::repository(&definition.name, url, definition.fetch);
                node.is_cloned = self.fs.exists(&child_dir.join(".git"));
                let is_cloned = node.is_cloned;
                let path = tree.add_node(owner, node)?;

                if is_cloned {
                    if let Some(nested) = self.config.find_document(&child_dir) {
                        self.load_level(tree, &path, &child_dir, &nested, stack)?;
                    }
                }
            }
        }
        stack.pop();
        Ok(())
    }
}

/// Rewrite the document owned by `owner` from the tree.
///
/// The `nodes:` list is regenerated from the owner's children. Workspace
/// metadata of an existing document is kept as is. A level without a
/// document on disk gets a fresh one.
pub fn persist_level(
    tree: &dyn TreeProvider,
    config: &dyn ConfigProvider,
    owner: &TreePath,
) -> Result<PathBuf> {
    let node = tree.get_node(owner)?;
    let document = node.document.clone().ok_or_else(|| Error::InvalidOperation {
        message: format!("{} has no tree-definition document", owner),
    })?;

    let mut doc = if config.exists(&document) {
        config.load(&document)?
    } else {
        WorkspaceConfig {
            workspace: WorkspaceMeta {
                name: node.name.clone(),
                repos_dir: node.repos_dir.clone(),
            },
            nodes: Vec::new(),
        }
    };

    doc.nodes = tree
        .list_children(owner)?
        .into_iter()
        .map(Node::definition)
        .collect();

    config.save(&document, &doc)?;
    debug!("saved {} ({} nodes)", document.display(), doc.nodes.len());
    Ok(document)
}
