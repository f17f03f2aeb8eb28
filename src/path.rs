//! Logical tree paths for grove
//!
//! A `TreePath` is a sequence of node names rooted at `/`. It never touches
//! platform separators: parsing always splits on `/`, and conversion to a
//! filesystem location happens in [`crate::layout`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Canonical absolute path of a node in the tree (`/`, `/team`, `/team/api`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and normalize a logical path.
    ///
    /// Empty segments and `.` are dropped, `..` pops a segment and stops at the
    /// root. A leading `/` is optional: every parsed path is absolute.
    pub fn parse(input: &str) -> Self {
        Self::root().join_relative(input)
    }

    /// Resolve `relative` against this path with the same normalization rules
    /// as [`TreePath::parse`]. An absolute `relative` ignores `self`.
    pub fn join_relative(&self, relative: &str) -> Self {
        let mut segments = if relative.starts_with('/') {
            Vec::new()
        } else {
            self.segments.clone()
        };

        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.to_string()),
            }
        }

        Self { segments }
    }

    /// Append one child name.
    pub fn join(&self, name: &str) -> Result<Self> {
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when `self` equals `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &TreePath) -> bool {
        self.segments.len() >= ancestor.segments.len()
            && self.segments[..ancestor.segments.len()] == ancestor.segments[..]
    }

    /// Every path from the root down to and including `self`.
    pub fn ancestors_inclusive(&self) -> Vec<TreePath> {
        (0..=self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for TreePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::parse(s))
    }
}

/// Check that `name` can be used as a single tree segment.
pub fn validate_segment(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("dot segments are reserved")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else if name.chars().any(char::is_control) {
        Some("name contains control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(TreePath::root().to_string(), "/");
        assert!(TreePath::root().is_root());
        assert_eq!(TreePath::root().parent(), None);
        assert_eq!(TreePath::root().name(), None);
    }

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(TreePath::parse("/team//api/").to_string(), "/team/api");
        assert_eq!(TreePath::parse("team/./api").to_string(), "/team/api");
        assert_eq!(TreePath::parse("/team/api/../web").to_string(), "/team/web");
        assert_eq!(TreePath::parse("/../..").to_string(), "/");
        assert_eq!(TreePath::parse("").to_string(), "/");
    }

    #[test]
    fn test_join_relative() {
        let base = TreePath::parse("/team/api");
        assert_eq!(base.join_relative("../web").to_string(), "/team/web");
        assert_eq!(base.join_relative("sub").to_string(), "/team/api/sub");
        assert_eq!(base.join_relative("/other").to_string(), "/other");
        assert_eq!(base.join_relative(".").to_string(), "/team/api");
    }

    #[test]
    fn test_join_and_parent() {
        let team = TreePath::root().join("team").unwrap();
        let api = team.join("api").unwrap();
        assert_eq!(api.to_string(), "/team/api");
        assert_eq!(api.parent(), Some(team.clone()));
        assert_eq!(api.name(), Some("api"));
        assert_eq!(api.depth(), 2);
        assert!(api.starts_with(&team));
        assert!(api.starts_with(&TreePath::root()));
        assert!(!team.starts_with(&api));
    }

    #[test]
    fn test_join_rejects_invalid_names() {
        let root = TreePath::root();
        assert!(root.join("").is_err());
        assert!(root.join("..").is_err());
        assert!(root.join("a/b").is_err());
        assert!(root.join("ok-name").is_ok());
    }

    #[test]
    fn test_starts_with_does_not_match_partial_segments() {
        let a = TreePath::parse("/team");
        let b = TreePath::parse("/teammates");
        assert!(!b.starts_with(&a));
    }

    #[test]
    fn test_ancestors_inclusive() {
        let paths: Vec<String> = TreePath::parse("/a/b")
            .ancestors_inclusive()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(paths, vec!["/", "/a", "/a/b"]);
    }

    #[test]
    fn test_ordering_is_lexicographic_by_segment() {
        let mut paths = vec![
            TreePath::parse("/b"),
            TreePath::parse("/a/z"),
            TreePath::parse("/a"),
            TreePath::root(),
        ];
        paths.sort();
        let shown: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["/", "/a", "/a/z", "/b"]);
    }
}
