//! # Path Resolver
//!
//! Turns what the user typed into one canonical [`TreePath`].
//!
//! | input                          | resolution                                   |
//! |--------------------------------|----------------------------------------------|
//! | `""`                           | the working directory, via the filesystem    |
//! | `"."`                          | the current node                             |
//! | absolute path in the workspace | via the filesystem                           |
//! | `/team/api`                    | logical, from the root                       |
//! | `api`, `../web`                | logical, from the current node, falling back |
//! |                                | to the filesystem for existing directories   |
//!
//! ## Filesystem resolution
//!
//! Every node directory is indexed twice when the two differ: as laid out
//! below the workspace root, and with symlinks resolved. A target is first
//! looked up as written (`.` and `..` removed), then with symlinks resolved,
//! so a checkout linked into a repos directory resolves either way.
//!
//! The deepest indexed directory containing the target decides. For a node
//! that owns a document (the root, a config reference, or a cloned
//! repository with its own `grove.yaml`) and has repos directory `R`, the
//! remainder `S` of the target decides:
//!
//! - `S` starts with `R/<child>`: that child, or `NodeNotFound`
//! - anything else: the level node itself
//!
//! Any other node owns everything below its directory. A target that no
//! indexed directory contains is outside the workspace.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::config::ConfigProvider;
use crate::error::{Error, Result};
use crate::filesystem::{lexical_normalize, FileSystemProvider};
use crate::layout::directory_index;
use crate::path::TreePath;
use crate::suggestions::node_hint;
use crate::tree::{Node, TreeProvider};

/// Resolves user input against one loaded tree
pub struct PathResolver<'a> {
    tree: &'a dyn TreeProvider,
    fs: &'a dyn FileSystemProvider,
    root_dir: PathBuf,
    index: BTreeMap<PathBuf, TreePath>,
}

impl<'a> PathResolver<'a> {
    /// `root_dir` must already be canonical.
    pub fn new(
        tree: &'a dyn TreeProvider,
        fs: &'a dyn FileSystemProvider,
        root_dir: &Path,
    ) -> Result<Self> {
        let mut index = directory_index(tree, &TreePath::root(), root_dir)?;
        let aliases: Vec<(PathBuf, TreePath)> = index
            .iter()
            .filter_map(|(dir, path)| {
                let physical = fs.canonicalize(dir);
                (physical != *dir).then(|| (physical, path.clone()))
            })
            .collect();
        for (physical, path) in aliases {
            index.entry(physical).or_insert(path);
        }
        Ok(Self {
            tree,
            fs,
            root_dir: root_dir.to_path_buf(),
            index,
        })
    }

    /// Resolve `input`, using `cwd` for empty and relative filesystem input.
    pub fn resolve(&self, input: &str, cwd: &Path) -> Result<TreePath> {
        let input = input.trim();
        if input.is_empty() {
            return self.resolve_filesystem(cwd);
        }
        if input == "." {
            return Ok(self.tree.get_current());
        }

        let candidate = Path::new(input);
        if candidate.is_absolute() {
            if let Some(owner) = self.owner_of(candidate) {
                return self.match_owner(&owner);
            }
        }

        let logical = self.tree.get_current().join_relative(input);
        if self.tree.get_node(&logical).is_ok() {
            return Ok(logical);
        }

        if !input.starts_with('/') {
            let on_disk = cwd.join(candidate);
            if self.fs.stat(&on_disk).is_ok_and(|stat| stat.is_dir) {
                debug!("'{}' is not a node, resolving {} on disk", input, on_disk.display());
                return self.resolve_filesystem(&on_disk);
            }
        }

        Err(self.not_found(&logical))
    }

    /// Resolve a filesystem location to the node whose directory contains it.
    pub fn resolve_filesystem(&self, target: &Path) -> Result<TreePath> {
        match self.owner_of(target) {
            Some(owner) => {
                let found = self.match_owner(&owner)?;
                debug!("{} belongs to {}", target.display(), found);
                Ok(found)
            }
            None => Err(Error::NodeNotFound {
                path: target.display().to_string(),
                hint: Some(format!(
                    "outside the workspace at {}",
                    self.root_dir.display()
                )),
            }),
        }
    }

    /// Directory of every node, as used for filesystem resolution.
    pub fn index(&self) -> &BTreeMap<PathBuf, TreePath> {
        &self.index
    }

    /// Deepest indexed directory containing `target`.
    fn owner_of(&self, target: &Path) -> Option<Owner> {
        let logical = lexical_normalize(target);
        if let Some(found) = self.deepest_indexed(&logical) {
            return Some(found);
        }
        let physical = self.fs.canonicalize(target);
        if physical == logical {
            return None;
        }
        self.deepest_indexed(&physical)
    }

    fn deepest_indexed(&self, target: &Path) -> Option<Owner> {
        target.ancestors().find_map(|dir| {
            self.index.get(dir).map(|path| Owner {
                path: path.clone(),
                suffix: suffix_segments(target, dir),
            })
        })
    }

    fn match_owner(&self, owner: &Owner) -> Result<TreePath> {
        let path = &owner.path;
        let node = self.tree.get_node(path)?;
        if !is_level(node) {
            return Ok(path.clone());
        }

        match owner.suffix.as_slice() {
            [area, child, ..] if *area == node.repos_dir => {
                let child_path = path.join(child)?;
                if self.tree.get_node(&child_path).is_ok() {
                    Ok(child_path)
                } else {
                    Err(self.not_found(&child_path))
                }
            }
            _ => Ok(path.clone()),
        }
    }

    fn not_found(&self, path: &TreePath) -> Error {
        let hint = match (path.parent(), path.name()) {
            (Some(parent), Some(name)) => self.tree.list_children(&parent).ok().and_then(|siblings| {
                let names: Vec<&str> = siblings.iter().map(|n| n.name.as_str()).collect();
                node_hint(name, &names)
            }),
            _ => None,
        };
        Error::NodeNotFound {
            path: path.to_string(),
            hint,
        }
    }
}

/// A node directory containing a target, and the target's remaining segments
struct Owner {
    path: TreePath,
    suffix: Vec<String>,
}

fn is_level(node: &Node) -> bool {
    node.is_root() || node.document.is_some()
}

fn suffix_segments(target: &Path, base: &Path) -> Vec<String> {
    target
        .strip_prefix(base)
        .map(|rest| {
            rest.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Find the workspace root for `start`.
///
/// The nearest directory holding a tree-definition document wins, unless an
/// ancestor document's repos directory contains it: a cloned repository that
/// carries its own `grove.yaml` belongs to the workspace above it.
///
/// `start` is searched as written first, so a working directory reached
/// through a symlinked node directory still finds the workspace it is linked
/// into. The resolved spelling is tried after that. The result is canonical.
pub fn find_workspace_root(
    start: &Path,
    fs: &dyn FileSystemProvider,
    config: &dyn ConfigProvider,
) -> Result<PathBuf> {
    let logical = lexical_normalize(start);
    let found = if logical.is_absolute() {
        discover(&logical, config)
    } else {
        None
    };
    let root = match found {
        Some(root) => root,
        None => {
            let physical = fs.canonicalize(start);
            discover(&physical, config).ok_or_else(|| Error::NotInitialized {
                message: format!("no grove.yaml in {} or any parent", physical.display()),
            })?
        }
    };
    Ok(fs.canonicalize(&root))
}

fn discover(start: &Path, config: &dyn ConfigProvider) -> Option<PathBuf> {
    let mut root = start
        .ancestors()
        .find(|dir| config.find_document(dir).is_some())
        .map(Path::to_path_buf)?;

    let mut candidate = root.parent().map(Path::to_path_buf);
    while let Some(dir) = candidate {
        if let Some(document) = config.find_document(&dir) {
            match config.load(&document) {
                Ok(doc) if root.starts_with(dir.join(&doc.workspace.repos_dir)) => {
                    debug!("{} is nested in {}", root.display(), dir.display());
                    root = dir.clone();
                }
                Ok(_) => {}
                Err(e) => debug!("ignoring {}: {}", document.display(), e),
            }
        }
        candidate = dir.parent().map(Path::to_path_buf);
    }
    Some(root)
}
