//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_workspace(documents::TWO_LEVELS);
//!     fixture.command().arg("tree").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::documents;
    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// `grove.yaml` snippets shared by the tests.
#[allow(dead_code)]
pub mod documents {
    /// A root with no nodes.
    pub const EMPTY: &str = "workspace:\n  name: empty\n";

    /// Eager `team` with a nested document, lazy `api`, and an `infra`
    /// reference with its own repos directory.
    pub const TWO_LEVELS: &str = r#"
workspace:
  name: platform
nodes:
  - name: team
    url: https://example.invalid/team.git
    fetch: eager
  - name: api
    url: https://example.invalid/api.git
    fetch: lazy
  - name: infra
    file: configs/infra.yaml
"#;

    /// Referenced from [`TWO_LEVELS`].
    pub const INFRA: &str = r#"
workspace:
  name: infra
  repos_dir: services
nodes:
  - name: db
    url: https://example.invalid/db.git
    fetch: lazy
"#;

    /// Nested document of `team`.
    pub const TEAM: &str = r#"
workspace:
  name: team
  repos_dir: repos
nodes:
  - name: service1
    url: https://example.invalid/service1.git
    fetch: lazy
"#;
}

/// Whether a `git` binary can be spawned.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// A temporary workspace directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the root `grove.yaml`.
    pub fn with_workspace(self, content: &str) -> Self {
        self.with_file("grove.yaml", content)
    }

    /// The [`documents::TWO_LEVELS`] workspace with its referenced document,
    /// `team` checked out and carrying [`documents::TEAM`].
    pub fn with_two_levels(self) -> Self {
        self.with_workspace(documents::TWO_LEVELS)
            .with_file("configs/infra.yaml", documents::INFRA)
            .with_checkout("nodes/team")
            .with_file("nodes/team/grove.yaml", documents::TEAM)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Make `dir` look like a working copy by creating `dir/.git`.
    pub fn with_checkout(self, dir: &str) -> Self {
        self.temp_dir
            .child(dir)
            .child(".git")
            .create_dir_all()
            .expect("Failed to create .git directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a file or directory inside the workspace.
    pub fn join(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Contents of a file inside the workspace.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `grove` command running in the workspace root with plain output.
    pub fn command(&self) -> assert_cmd::Command {
        self.command_in("")
    }

    /// A `grove` command running in `dir`, relative to the workspace root.
    pub fn command_in(&self, dir: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("grove");
        cmd.current_dir(self.join(dir))
            .env_remove("GROVE_WORKSPACE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_two_levels_layout() {
        let fixture = TestFixture::new().with_two_levels();
        assert!(fixture.join("grove.yaml").exists());
        assert!(fixture.join("nodes/team/.git").is_dir());
        assert!(fixture.join("configs/infra.yaml").exists());
    }

    #[test]
    fn test_documents_are_valid_yaml() {
        for document in [
            documents::EMPTY,
            documents::TWO_LEVELS,
            documents::INFRA,
            documents::TEAM,
        ] {
            grove::config::parse(document).expect("document should parse");
        }
    }
}
