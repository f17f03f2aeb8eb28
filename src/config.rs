//! # Tree-Definition Documents
//!
//! This module defines the `grove.yaml` schema and the [`ConfigProvider`]
//! persistence boundary.
//!
//! A document describes one level of the tree:
//!
//! ```yaml
//! workspace:
//!   name: platform
//!   repos_dir: nodes
//! nodes:
//!   - name: api
//!     url: https://github.com/acme/api.git
//!     fetch: lazy
//!   - name: infra
//!     file: configs/infra.yaml
//! ```
//!
//! Repositories declared at a level are cloned into `<level dir>/<repos_dir>/`.
//! A node with `file:` delegates its children to another document, which
//! brings its own `repos_dir`.
//!
//! ## Key Components
//!
//! - **`WorkspaceConfig`**: one parsed document.
//! - **`NodeDefinition`**: one `nodes:` entry, with `url` XOR `file`.
//! - **`FetchMode`**: `eager`, `lazy` or `auto`.
//! - **`ConfigProvider`**: load/save/exists, implemented for YAML files on disk
//!   (`YamlConfigProvider`) and in memory (`MemoryConfigProvider`).

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::defaults::{config_candidates, DEFAULT_REPOS_DIR, EAGER_NAME_SUFFIXES};
use crate::error::{Error, Result};
use crate::path::validate_segment;

/// When a repository node gets cloned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Cloned as soon as it is added or first visited
    Eager,
    /// Cloned only when explicitly requested
    Lazy,
    /// Eager for meta-repository names, lazy otherwise
    #[default]
    Auto,
}

impl FetchMode {
    /// Whether a node named `name` with this mode is lazy.
    pub fn is_lazy_for(self, name: &str) -> bool {
        match self {
            FetchMode::Eager => false,
            FetchMode::Lazy => true,
            FetchMode::Auto => !is_meta_name(name),
        }
    }

    fn is_auto(&self) -> bool {
        matches!(self, FetchMode::Auto)
    }
}

fn is_meta_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    EAGER_NAME_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

/// Workspace metadata of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMeta {
    /// Display name of the level
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Directory under the level directory that holds its repositories
    #[serde(default = "default_repos_dir")]
    pub repos_dir: String,
}

fn default_repos_dir() -> String {
    DEFAULT_REPOS_DIR.to_string()
}

impl Default for WorkspaceMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            repos_dir: default_repos_dir(),
        }
    }
}

/// One entry of the `nodes:` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    /// Segment name, unique among siblings
    pub name: String,
    /// Remote URL of a repository node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Reference to another tree-definition document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "FetchMode::is_auto")]
    pub fetch: FetchMode,
}

impl NodeDefinition {
    pub fn repository(name: &str, url: &str, fetch: FetchMode) -> Self {
        Self {
            name: name.to_string(),
            url: Some(url.to_string()),
            file: None,
            fetch,
        }
    }

    pub fn reference(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            url: None,
            file: Some(file.to_string()),
            fetch: FetchMode::Auto,
        }
    }
}

/// One parsed tree-definition document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceMeta,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

impl WorkspaceConfig {
    /// An empty document with the given level name
    pub fn named(name: &str) -> Self {
        Self {
            workspace: WorkspaceMeta {
                name: name.to_string(),
                ..WorkspaceMeta::default()
            },
            nodes: Vec::new(),
        }
    }

    pub fn find(&self, name: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

/// Parse and validate a document.
///
/// An empty document (or one holding only comments) is a valid empty level.
pub fn parse(yaml: &str) -> Result<WorkspaceConfig> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("Check the YAML syntax (indentation, quoting)".to_string()),
    })?;

    if value.is_null() {
        return Ok(WorkspaceConfig::default());
    }

    let config: WorkspaceConfig = serde_yaml::from_value(value).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("missing field `name`") {
            Some("Every entry under 'nodes:' needs a 'name:'".to_string())
        } else if message.contains("unknown field") {
            Some("Node entries accept only 'name', 'url', 'file' and 'fetch'".to_string())
        } else if message.contains("unknown variant") {
            Some("'fetch' must be one of: eager, lazy, auto".to_string())
        } else {
            None
        };
        Error::ConfigParse { message, hint }
    })?;

    validate(&config)?;
    Ok(config)
}

/// Check naming, uniqueness and the url XOR file rule.
pub fn validate(config: &WorkspaceConfig) -> Result<()> {
    validate_segment(&config.workspace.repos_dir).map_err(|e| Error::ConfigParse {
        message: format!("invalid repos_dir '{}': {}", config.workspace.repos_dir, e),
        hint: Some("repos_dir must be a single directory name".to_string()),
    })?;

    let mut seen = HashSet::new();
    for node in &config.nodes {
        validate_segment(&node.name).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?;

        if !seen.insert(node.name.as_str()) {
            return Err(Error::ConfigParse {
                message: format!("duplicate node name '{}'", node.name),
                hint: Some("Sibling names must be unique".to_string()),
            });
        }

        let has_url = node.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        let has_file = node.file.as_deref().is_some_and(|f| !f.trim().is_empty());
        match (has_url, has_file) {
            (true, true) => {
                return Err(Error::ConfigParse {
                    message: format!("node '{}' sets both url and file", node.name),
                    hint: Some("Keep either 'url:' or 'file:'".to_string()),
                })
            }
            (false, false) => {
                return Err(Error::ConfigParse {
                    message: format!("node '{}' needs a url or a file", node.name),
                    hint: Some("Add 'url:' for a repository or 'file:' for a config reference".to_string()),
                })
            }
            _ => {}
        }
    }

    Ok(())
}

/// Serialize a document with a short header.
pub fn to_yaml(config: &WorkspaceConfig) -> Result<String> {
    let body = serde_yaml::to_string(config)?;
    Ok(format!("# grove workspace definition\n{}", body))
}

/// Read and parse a document from disk
pub fn from_file(path: &Path) -> Result<WorkspaceConfig> {
    let content = fs::read_to_string(path)?;
    parse(&content).map_err(|e| match e {
        Error::ConfigParse { message, hint } => Error::ConfigParse {
            message: format!("{}: {}", path.display(), message),
            hint,
        },
        other => other,
    })
}

/// Resolve a `file:` reference relative to the document that declares it.
///
/// Supports absolute paths, `~/` and paths relative to the declaring
/// document's directory.
pub fn resolve_reference(declaring_document: &Path, reference: &str) -> PathBuf {
    if let Some(rest) = reference.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    let candidate = Path::new(reference);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }

    declaring_document
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(candidate)
}

static SCP_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/@]+@[^:]+:(.+)$").expect("scp-like pattern is valid"));

/// Derive a node name from a repository URL.
///
/// Handles `https://` style URLs, scp-like `git@host:org/repo.git` and local
/// paths. A trailing `.git` is removed.
pub fn name_from_url(repository: &str) -> Option<String> {
    let trimmed = repository.trim().trim_end_matches('/');

    let last = match url::Url::parse(trimmed) {
        Ok(parsed) if parsed.has_host() => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        _ => {
            let path = SCP_LIKE
                .captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or(trimmed);
            path.rsplit(['/', '\\']).find(|s| !s.is_empty()).map(str::to_string)
        }
    }?;

    let name = last.strip_suffix(".git").unwrap_or(&last).to_string();
    validate_segment(&name).ok()?;
    Some(name)
}

/// Persistence boundary for tree-definition documents
pub trait ConfigProvider: Send + Sync {
    /// Load and validate the document at `path`
    fn load(&self, path: &Path) -> Result<WorkspaceConfig>;

    /// Validate and write `config` to `path`
    fn save(&self, path: &Path, config: &WorkspaceConfig) -> Result<()>;

    /// Check whether a document exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// The document inside `dir`, if any, following the lookup order of
    /// [`crate::defaults::CONFIG_FILENAMES`].
    fn find_document(&self, dir: &Path) -> Option<PathBuf> {
        config_candidates(dir)
            .into_iter()
            .find(|candidate| self.exists(candidate))
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Arc<T> {
    fn load(&self, path: &Path) -> Result<WorkspaceConfig> {
        (**self).load(path)
    }

    fn save(&self, path: &Path, config: &WorkspaceConfig) -> Result<()> {
        (**self).save(path, config)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn find_document(&self, dir: &Path) -> Option<PathBuf> {
        (**self).find_document(dir)
    }
}

/// `ConfigProvider` reading and writing YAML files on disk
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlConfigProvider;

impl ConfigProvider for YamlConfigProvider {
    fn load(&self, path: &Path) -> Result<WorkspaceConfig> {
        from_file(path)
    }

    fn save(&self, path: &Path, config: &WorkspaceConfig) -> Result<()> {
        validate(config)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, to_yaml(config)?)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory `ConfigProvider` for tests and benchmarks
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    documents: Mutex<BTreeMap<PathBuf, WorkspaceConfig>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document without counting it as a save
    pub fn insert<P: AsRef<Path>>(&self, path: P, config: WorkspaceConfig) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(path.as_ref().to_path_buf(), config);
        }
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<WorkspaceConfig> {
        self.documents.lock().ok()?.get(path.as_ref()).cloned()
    }

    /// Make every subsequent `save` fail
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self, path: &Path) -> Result<WorkspaceConfig> {
        self.get(path).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }

    fn save(&self, path: &Path, config: &WorkspaceConfig) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Filesystem {
                message: format!("cannot write {}", path.display()),
            });
        }
        validate(config)?;
        let mut documents = self.documents.lock().map_err(|_| Error::LockPoisoned {
            context: "memory config provider".to_string(),
        })?;
        documents.insert(path.to_path_buf(), config.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.documents
            .lock()
            .map(|documents| documents.contains_key(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
workspace:
  name: platform
  repos_dir: repos
nodes:
  - name: api
    url: https://github.com/acme/api.git
    fetch: lazy
  - name: infra
    file: configs/infra.yaml
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.workspace.name, "platform");
        assert_eq!(config.workspace.repos_dir, "repos");
        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.nodes[0].fetch, FetchMode::Lazy);
        assert_eq!(config.nodes[1].file.as_deref(), Some("configs/infra.yaml"));
        assert_eq!(config.nodes[1].fetch, FetchMode::Auto);
    }

    #[test]
    fn test_parse_defaults_repos_dir() {
        let config = parse("workspace:\n  name: ws\n").unwrap();
        assert_eq!(config.workspace.repos_dir, DEFAULT_REPOS_DIR);
        assert!(config.nodes.is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        let config = parse("# nothing here\n").unwrap();
        assert_eq!(config, WorkspaceConfig::default());
    }

    #[test]
    fn test_parse_rejects_url_and_file() {
        let yaml = r#"
nodes:
  - name: both
    url: https://example.com/both.git
    file: other.yaml
"#;
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("sets both url and file"));
    }

    #[test]
    fn test_parse_rejects_missing_url_and_file() {
        let err = parse("nodes:\n  - name: empty\n").unwrap_err();
        assert!(err.to_string().contains("needs a url or a file"));
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        let yaml = r#"
nodes:
  - name: api
    url: a
  - name: api
    url: b
"#;
        let err = parse(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate node name 'api'"));
    }

    #[test]
    fn test_parse_missing_name_has_hint() {
        let err = parse("nodes:\n  - url: https://example.com/x.git\n").unwrap_err();
        assert!(err.to_string().contains("hint: Every entry"));
    }

    #[test]
    fn test_parse_bad_fetch_mode_has_hint() {
        let err = parse("nodes:\n  - name: x\n    url: u\n    fetch: sometimes\n").unwrap_err();
        assert!(err.to_string().contains("eager, lazy, auto"));
    }

    #[test]
    fn test_parse_rejects_nested_repos_dir() {
        let err = parse("workspace:\n  repos_dir: a/b\n").unwrap_err();
        assert!(err.to_string().contains("invalid repos_dir"));
    }

    #[test]
    fn test_auto_fetch_mode() {
        assert!(FetchMode::Auto.is_lazy_for("api"));
        assert!(!FetchMode::Auto.is_lazy_for("acme-platform"));
        assert!(!FetchMode::Auto.is_lazy_for("Team-Meta"));
        assert!(!FetchMode::Eager.is_lazy_for("api"));
        assert!(FetchMode::Lazy.is_lazy_for("acme-platform"));
    }

    #[test]
    fn test_to_yaml_omits_defaults() {
        let mut config = WorkspaceConfig::named("ws");
        config
            .nodes
            .push(NodeDefinition::repository("api", "https://x/api.git", FetchMode::Auto));
        config
            .nodes
            .push(NodeDefinition::repository("web", "https://x/web.git", FetchMode::Lazy));
        let yaml = to_yaml(&config).unwrap();
        assert!(yaml.starts_with("# grove workspace definition"));
        assert!(yaml.contains("fetch: lazy"));
        assert_eq!(yaml.matches("fetch:").count(), 1);
        assert!(!yaml.contains("file:"));
        assert_eq!(parse(&yaml).unwrap(), config);
    }

    #[test]
    fn test_resolve_reference() {
        let doc = Path::new("/ws/grove.yaml");
        assert_eq!(
            resolve_reference(doc, "configs/infra.yaml"),
            PathBuf::from("/ws/configs/infra.yaml")
        );
        assert_eq!(
            resolve_reference(doc, "/abs/infra.yaml"),
            PathBuf::from("/abs/infra.yaml")
        );
    }

    #[test]
    fn test_name_from_url() {
        assert_eq!(
            name_from_url("https://github.com/acme/api.git").as_deref(),
            Some("api")
        );
        assert_eq!(
            name_from_url("https://github.com/acme/web/").as_deref(),
            Some("web")
        );
        assert_eq!(
            name_from_url("git@github.com:acme/tools.git").as_deref(),
            Some("tools")
        );
        assert_eq!(name_from_url("/srv/git/local-repo").as_deref(), Some("local-repo"));
        assert_eq!(name_from_url("").as_deref(), None);
    }

    #[test]
    fn test_yaml_provider_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sub/grove.yaml");
        let provider = YamlConfigProvider;

        let mut config = WorkspaceConfig::named("ws");
        config.nodes.push(NodeDefinition::reference("infra", "infra.yaml"));

        assert!(!provider.exists(&path));
        provider.save(&path, &config).unwrap();
        assert!(provider.exists(&path));
        assert_eq!(provider.load(&path).unwrap(), config);
        assert_eq!(provider.find_document(&temp.path().join("sub")), Some(path));
    }

    #[test]
    fn test_yaml_provider_load_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("grove.yaml");
        fs::write(&path, "nodes:\n  - name: x\n").unwrap();
        let err = YamlConfigProvider.load(&path).unwrap_err();
        assert!(err.to_string().contains("grove.yaml"));
    }

    #[test]
    fn test_memory_provider_counts_and_failures() {
        let provider = MemoryConfigProvider::new();
        let path = Path::new("/ws/grove.yaml");
        provider.insert(path, WorkspaceConfig::named("ws"));
        assert!(provider.exists(path));
        assert_eq!(provider.save_count(), 0);

        provider.save(path, &WorkspaceConfig::named("ws2")).unwrap();
        assert_eq!(provider.save_count(), 1);
        assert_eq!(provider.load(path).unwrap().workspace.name, "ws2");

        provider.set_fail_saves(true);
        assert!(provider.save(path, &WorkspaceConfig::named("ws3")).is_err());
        assert_eq!(provider.load(path).unwrap().workspace.name, "ws2");
    }
}
