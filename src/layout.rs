//! Mapping between tree paths and workspace directories.
//!
//! A node lives in the repos directory of its parent's level:
//!
//! ```text
//! dir("/")         = workspace root
//! dir(parent/name) = dir(parent) / parent.repos_dir / name
//! ```
//!
//! so every level brings its own `repos_dir`, including levels defined by a
//! config reference or by a cloned repository's nested document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::path::TreePath;
use crate::tree::TreeProvider;

/// Filesystem directory of the node at `path`.
pub fn node_dir(tree: &dyn TreeProvider, root_dir: &Path, path: &TreePath) -> Result<PathBuf> {
    let mut dir = root_dir.to_path_buf();
    let mut current = TreePath::root();
    for segment in path.segments() {
        let level = tree.get_node(&current)?;
        dir.push(&level.repos_dir);
        dir.push(segment);
        current = current.join(segment)?;
    }
    // The target itself must exist too
    tree.get_node(path)?;
    Ok(dir)
}

/// Directory of every node below `start` (inclusive), keyed by directory.
///
/// `start_dir` must be the directory of `start`.
pub fn directory_index(
    tree: &dyn TreeProvider,
    start: &TreePath,
    start_dir: &Path,
) -> Result<BTreeMap<PathBuf, TreePath>> {
    let mut index = BTreeMap::new();
    index_into(tree, start, start_dir, &mut index)?;
    Ok(index)
}

fn index_into(
    tree: &dyn TreeProvider,
    path: &TreePath,
    dir: &Path,
    index: &mut BTreeMap<PathBuf, TreePath>,
) -> Result<()> {
    let node = tree.get_node(path)?;
    index.insert(dir.to_path_buf(), path.clone());
    let area = dir.join(&node.repos_dir);
    for child in &node.children {
        index_into(tree, &path.join(child)?, &area.join(child), index)?;
    }
    Ok(())
}
