//! # Tree Command Implementation
//!
//! Displays the node tree below a node (the workspace root by default):
//!
//! ```text
//! platform
//! ├─ team (cloned)
//! │  └─ api (lazy)
//! └─ infra/ -> configs/infra.yaml
//!    └─ db (missing)
//! ```
//!
//! This command only reads the tree and the disk layout. It runs no git
//! command, so working-copy changes are left to `grove status`.

use std::borrow::Cow;
use std::io;

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, Style, TreeItem};

use super::Context;
use grove::path::TreePath;
use grove::suggestions;
use grove::tree::{Node, TreeProvider, TreeStore};

/// Display the node tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Node to start from (defaults to the workspace root)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Maximum depth to display.
    ///
    /// Use 0 to show only the starting node, 1 for its children, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, context: &Context) -> Result<()> {
    let manager = context.manager()?;
    let start = match args.path.as_deref() {
        Some(input) => manager.resolve(input).map_err(suggestions::explain)?,
        None => TreePath::root(),
    };
    let tree = manager.tree()?;
    let root_label = manager
        .root_dir()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string());

    let max_depth = args.depth.unwrap_or(usize::MAX);
    let display = build_display_node(tree, &start, &root_label, max_depth, 0)?;
    print_tree(&display).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
    Ok(())
}

fn build_display_node(
    tree: &TreeStore,
    path: &TreePath,
    root_label: &str,
    max_depth: usize,
    depth: usize,
) -> Result<DisplayNode> {
    let node = tree.get_node(path)?;
    let label = if node.is_root() {
        root_label.to_string()
    } else {
        node_label(node)
    };

    let mut children = Vec::new();
    if depth < max_depth {
        for child in tree.list_children(path)? {
            children.push(build_display_node(
                tree,
                &child.path,
                root_label,
                max_depth,
                depth + 1,
            )?);
        }
    }
    Ok(DisplayNode { label, children })
}

fn node_label(node: &Node) -> String {
    if let Some(file) = &node.config_file {
        return format!("{}/ -> {}", node.name, file);
    }
    let state = if node.is_cloned {
        "cloned"
    } else if node.is_lazy {
        "lazy"
    } else {
        "missing"
    };
    format!("{} ({})", node.name, state)
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct DisplayNode {
    label: String,
    children: Vec<DisplayNode>,
}

impl TreeItem for DisplayNode {
    type Child = DisplayNode;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove::config::FetchMode;

    fn sample() -> TreeStore {
        let mut tree = TreeStore::new(Node::root("/ws/grove.yaml".into(), "nodes"));
        let mut team = Node::repository("team", "https://x/team.git", FetchMode::Eager);
        team.is_cloned = true;
        team.has_changes = true;
        let team = tree.add_node(&TreePath::root(), team).unwrap();
        tree.add_node(
            &team,
            Node::repository("api", "https://x/api.git", FetchMode::Lazy),
        )
        .unwrap();
        tree.add_node(&TreePath::root(), Node::reference("infra", "infra.yaml"))
            .unwrap();
        tree
    }

    #[test]
    fn test_labels() {
        let tree = sample();
        let display = build_display_node(&tree, &TreePath::root(), "ws", usize::MAX, 0).unwrap();
        assert_eq!(display.label, "ws");
        assert_eq!(display.children[0].label, "team (cloned)");
        assert_eq!(display.children[0].children[0].label, "api (lazy)");
        assert_eq!(display.children[1].label, "infra/ -> infra.yaml");
    }

    #[test]
    fn test_cached_change_flag_is_not_displayed() {
        let tree = sample();
        let team = tree.get_node(&TreePath::parse("/team")).unwrap();
        assert!(team.has_changes);
        assert_eq!(node_label(team), "team (cloned)");
    }

    #[test]
    fn test_depth_limit() {
        let tree = sample();
        let display = build_display_node(&tree, &TreePath::root(), "ws", 1, 0).unwrap();
        assert_eq!(display.children.len(), 2);
        assert!(display.children[0].children.is_empty());
    }
}
