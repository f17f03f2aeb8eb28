//! Default values for grove configuration.
//!
//! This module provides centralized default values used across the library
//! and the commands, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// File name written by `grove init` and `grove add`.
pub const DEFAULT_CONFIG_FILENAME: &str = "grove.yaml";

/// Every file name recognized as a tree-definition document, in lookup order.
pub const CONFIG_FILENAMES: &[&str] = &["grove.yaml", "grove.yml"];

/// Child-area directory name used when a document does not set `repos_dir`.
pub const DEFAULT_REPOS_DIR: &str = "nodes";

/// Environment variable that points the CLI at a workspace root.
pub const WORKSPACE_ENV: &str = "GROVE_WORKSPACE";

/// Name suffixes that make an `auto` fetch mode resolve to eager.
pub const EAGER_NAME_SUFFIXES: &[&str] = &["-meta", "-platform", "-workspace", "-root", "-monorepo"];

/// Candidate document paths inside `dir`, in lookup order.
pub fn config_candidates(dir: &Path) -> Vec<PathBuf> {
    CONFIG_FILENAMES.iter().map(|name| dir.join(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_first_candidate() {
        let candidates = config_candidates(Path::new("/ws"));
        assert_eq!(candidates[0], PathBuf::from("/ws").join(DEFAULT_CONFIG_FILENAME));
        assert_eq!(candidates.len(), CONFIG_FILENAMES.len());
    }

    #[test]
    fn test_default_repos_dir_is_single_segment() {
        assert!(!DEFAULT_REPOS_DIR.contains('/'));
        assert!(!DEFAULT_REPOS_DIR.is_empty());
    }
}
