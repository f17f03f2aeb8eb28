//! Filesystem access behind a substitutable provider
//!
//! The core never calls `std::fs` directly for workspace directories. It goes
//! through [`FileSystemProvider`], implemented by [`OsFileSystem`] for real
//! runs and by [`MemoryFS`] for tests and benchmarks.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};

/// The subset of metadata the core needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub is_file: bool,
    pub is_symlink: bool,
}

/// Directory-level filesystem operations used by the loader, the resolver
/// and the lazy-clone coordinator.
pub trait FileSystemProvider: Send + Sync {
    /// Check whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and all missing parents
    fn mkdir_all(&self, path: &Path) -> Result<()>;

    /// Delete `path` and everything below it
    fn remove_all(&self, path: &Path) -> Result<()>;

    /// Metadata for `path` (symlinks are not followed)
    fn stat(&self, path: &Path) -> Result<FileStat>;

    /// True when `path` is a directory without entries
    fn is_empty_dir(&self, path: &Path) -> Result<bool>;

    /// Resolve symlinks where possible, falling back to lexical normalization
    /// for paths that do not exist.
    fn canonicalize(&self, path: &Path) -> PathBuf;
}

/// `FileSystemProvider` backed by the host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystemProvider for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn mkdir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<FileStat> {
        let metadata = fs::symlink_metadata(path)?;
        let is_symlink = metadata.file_type().is_symlink();
        // Report the target kind for symlinks so a linked config dir still
        // counts as a directory.
        let target = if is_symlink {
            fs::metadata(path).unwrap_or(metadata)
        } else {
            metadata
        };
        Ok(FileStat {
            is_dir: target.is_dir(),
            is_file: target.is_file(),
            is_symlink,
        })
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        Ok(fs::read_dir(path)?.next().is_none())
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| lexical_normalize(path))
    }
}

impl<T: FileSystemProvider + ?Sized> FileSystemProvider for Arc<T> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn mkdir_all(&self, path: &Path) -> Result<()> {
        (**self).mkdir_all(path)
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        (**self).remove_all(path)
    }

    fn stat(&self, path: &Path) -> Result<FileStat> {
        (**self).stat(path)
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        (**self).is_empty_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        (**self).canonicalize(path)
    }
}

/// Remove `.` and `..` components without touching the filesystem.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[derive(Debug, Clone)]
enum Entry {
    Dir,
    File(Vec<u8>),
}

/// In-memory filesystem for tests and benchmarks.
///
/// Paths are stored lexically normalized. Creating a file creates its parent
/// directories, mirroring what the real workspace looks like after a clone.
#[derive(Debug, Default)]
pub struct MemoryFS {
    entries: Mutex<BTreeMap<PathBuf, Entry>>,
    fail_removals: AtomicBool,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PathBuf, Entry>>> {
        self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "memory filesystem".to_string(),
        })
    }

    fn insert_dirs(entries: &mut BTreeMap<PathBuf, Entry>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            entries.entry(ancestor.to_path_buf()).or_insert(Entry::Dir);
        }
    }

    /// Add a file with string content, creating parent directories
    pub fn add_file_string<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<()> {
        let path = lexical_normalize(path.as_ref());
        let mut entries = self.lock()?;
        if let Some(parent) = path.parent() {
            Self::insert_dirs(&mut entries, parent);
        }
        entries.insert(path, Entry::File(content.as_bytes().to_vec()));
        Ok(())
    }

    /// Mark `dir` as a cloned repository by creating `dir/.git`.
    pub fn add_git_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        self.mkdir_all(&dir.as_ref().join(".git"))
    }

    /// Read back a file added with [`MemoryFS::add_file_string`].
    pub fn read_to_string<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        let path = lexical_normalize(path.as_ref());
        match self.lock().ok()?.get(&path) {
            Some(Entry::File(content)) => String::from_utf8(content.clone()).ok(),
            _ => None,
        }
    }

    /// Make every subsequent `remove_all` fail, to exercise best-effort paths.
    pub fn set_fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    /// Get the number of entries (files and directories)
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSystemProvider for MemoryFS {
    fn exists(&self, path: &Path) -> bool {
        let path = lexical_normalize(path);
        self.lock()
            .map(|entries| entries.contains_key(&path))
            .unwrap_or(false)
    }

    fn mkdir_all(&self, path: &Path) -> Result<()> {
        let path = lexical_normalize(path);
        let mut entries = self.lock()?;
        if let Some(Entry::File(_)) = entries.get(&path) {
            return Err(Error::Filesystem {
                message: format!("{} exists and is a file", path.display()),
            });
        }
        Self::insert_dirs(&mut entries, &path);
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(Error::Filesystem {
                message: format!("refusing to remove {}", path.display()),
            });
        }
        let path = lexical_normalize(path);
        let mut entries = self.lock()?;
        if !entries.contains_key(&path) {
            return Err(Error::Filesystem {
                message: format!("{} does not exist", path.display()),
            });
        }
        entries.retain(|key, _| !key.starts_with(&path));
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<FileStat> {
        let path = lexical_normalize(path);
        match self.lock()?.get(&path) {
            Some(Entry::Dir) => Ok(FileStat {
                is_dir: true,
                is_file: false,
                is_symlink: false,
            }),
            Some(Entry::File(_)) => Ok(FileStat {
                is_dir: false,
                is_file: true,
                is_symlink: false,
            }),
            None => Err(Error::Filesystem {
                message: format!("{} does not exist", path.display()),
            }),
        }
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        let path = lexical_normalize(path);
        let entries = self.lock()?;
        match entries.get(&path) {
            Some(Entry::Dir) => Ok(!entries
                .keys()
                .any(|key| key.parent() == Some(path.as_path()))),
            _ => Err(Error::Filesystem {
                message: format!("{} is not a directory", path.display()),
            }),
        }
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        lexical_normalize(path)
    }
}
