//! # Grove Library
//!
//! This library provides the core of the `grove` command-line tool: it
//! organizes many git repositories into one navigable tree described by
//! `grove.yaml` documents, resolves user input to nodes of that tree, and
//! runs git operations over whole subtrees.
//!
//! ## Quick Example
//!
//! ```
//! use grove::config;
//! use grove::filesystem::{FileSystemProvider, MemoryFS};
//!
//! // Create an in-memory filesystem
//! let fs = MemoryFS::new();
//! fs.add_git_dir("/ws/nodes/api").unwrap();
//! assert!(fs.exists(std::path::Path::new("/ws/nodes/api/.git")));
//!
//! // Parse a tree definition
//! let document = config::parse(
//!     r#"
//! workspace:
//!   name: platform
//! nodes:
//!   - name: api
//!     url: https://github.com/acme/api.git
//! "#,
//! )
//! .unwrap();
//! assert_eq!(document.nodes.len(), 1);
//! assert_eq!(document.workspace.repos_dir, "nodes");
//! ```
//!
//! ## Core Concepts
//!
//! - **Tree definitions (`config`)**: the `grove.yaml` schema. Each document
//!   is one level of the tree and names the directory (`repos_dir`) its
//!   repositories are cloned into.
//! - **Tree store (`tree`, `path`)**: nodes addressed by slash-separated
//!   [`path::TreePath`]s, behind the [`tree::TreeProvider`] trait.
//! - **Loading and layout (`loader`, `layout`)**: building the tree from the
//!   documents, following `file:` references, and mapping nodes to
//!   directories.
//! - **Resolution (`resolver`)**: turning names, relative paths, absolute tree
//!   paths and filesystem paths into tree paths.
//! - **Operations (`engine`, `lazy`)**: pre-order traversal applying a git
//!   operation per node, cloning missing working copies on the way and
//!   collecting failures instead of stopping at the first one.
//! - **Manager (`manager`)**: the façade used by the CLI.
//!
//! Git, the filesystem and document persistence are reached through traits
//! (`repository::GitProvider`, `filesystem::FileSystemProvider`,
//! `config::ConfigProvider`) so the whole library can run against in-memory
//! doubles.

pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod layout;
pub mod lazy;
pub mod loader;
pub mod manager;
pub mod output;
pub mod path;
pub mod repository;
pub mod resolver;
pub mod suggestions;
pub mod tree;

#[cfg(test)]
mod path_proptest;
