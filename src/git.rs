//! System `git` invocations
//!
//! Every function here runs the `git` binary found on `PATH`, so SSH keys,
//! credential helpers and `~/.gitconfig` behave exactly as they do in a
//! terminal. Failures carry the command and its stderr.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Working-tree state of one repository, from `git status --porcelain=v2`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitStatus {
    /// Current branch, or `None` when HEAD is detached
    pub branch: Option<String>,
    pub is_clean: bool,
    pub has_untracked: bool,
    pub has_staged: bool,
    pub has_modified: bool,
    /// Paths reported by git, in output order
    pub files: Vec<String>,
    pub ahead: u32,
    pub behind: u32,
}

impl GitStatus {
    /// A clean status on `branch`, mostly useful for tests.
    pub fn clean(branch: &str) -> Self {
        Self {
            branch: Some(branch.to_string()),
            is_clean: true,
            ..Self::default()
        }
    }
}

fn run(dir: Option<&Path>, args: &[&str]) -> Result<Output> {
    let mut command = Command::new("git");
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    debug!("git {}", args.join(" "));

    command.output().map_err(|e| Error::GitCommand {
        command: args.join(" "),
        path: dir.map(Path::to_path_buf).unwrap_or_default(),
        stderr: e.to_string(),
    })
}

fn run_checked(dir: &Path, args: &[&str]) -> Result<String> {
    let output = run(Some(dir), args)?;
    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Clone `url` into `target_dir`
///
/// The parent directory is created when missing. `git clone` itself refuses
/// non-empty targets, so an occupied directory surfaces as a clone error.
pub fn clone(url: &str, target_dir: &Path, depth: Option<u32>) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let depth_arg = depth.map(|d| format!("--depth={}", d));
    let mut args = vec!["clone"];
    if let Some(depth_arg) = depth_arg.as_deref() {
        args.push(depth_arg);
    }
    args.push(url);
    let target = target_dir.to_string_lossy();
    args.push(&target);

    let output = run(None, &args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            path: target_dir.to_path_buf(),
            message,
        });
    }

    Ok(())
}

pub fn pull(dir: &Path, force: bool, rebase: bool) -> Result<()> {
    let mut args = vec!["pull"];
    if force {
        args.push("--force");
    }
    if rebase {
        args.push("--rebase");
    }
    run_checked(dir, &args).map(|_| ())
}

pub fn push(dir: &Path, force: bool, set_upstream: bool) -> Result<()> {
    let mut args = vec!["push"];
    if force {
        args.push("--force-with-lease");
    }
    if set_upstream {
        args.extend(["--set-upstream", "origin", "HEAD"]);
    }
    run_checked(dir, &args).map(|_| ())
}

pub fn fetch(dir: &Path, prune: bool) -> Result<()> {
    let mut args = vec!["fetch"];
    if prune {
        args.push("--prune");
    }
    run_checked(dir, &args).map(|_| ())
}

/// Stage `pathspecs`, or everything when the list is empty
pub fn add(dir: &Path, pathspecs: &[String]) -> Result<()> {
    let mut args = vec!["add"];
    if pathspecs.is_empty() {
        args.push("--all");
    } else {
        args.push("--");
        args.extend(pathspecs.iter().map(String::as_str));
    }
    run_checked(dir, &args).map(|_| ())
}

pub fn commit(dir: &Path, message: &str) -> Result<()> {
    run_checked(dir, &["commit", "--message", message]).map(|_| ())
}

pub fn checkout(dir: &Path, branch: &str, create: bool) -> Result<()> {
    let args = if create {
        vec!["checkout", "-b", branch]
    } else {
        vec!["checkout", branch]
    };
    run_checked(dir, &args).map(|_| ())
}

/// URL of `remote`, or `None` when the remote is not configured
pub fn remote_url(dir: &Path, remote: &str) -> Result<Option<String>> {
    let output = run(Some(dir), &["remote", "get-url", remote])?;
    if !output.status.success() {
        return Ok(None);
    }
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if url.is_empty() { None } else { Some(url) })
}

pub fn status(dir: &Path) -> Result<GitStatus> {
    let stdout = run_checked(dir, &["status", "--porcelain=v2", "--branch"])?;
    parse_porcelain_v2(&stdout)
}

static AHEAD_BEHIND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^# branch\.ab \+(\d+) -(\d+)$").expect("branch.ab pattern is valid")
});

/// Parse `git status --porcelain=v2 --branch` output
pub fn parse_porcelain_v2(output: &str) -> Result<GitStatus> {
    let mut status = GitStatus::default();

    for line in output.lines() {
        if let Some(head) = line.strip_prefix("# branch.head ") {
            if head != "(detached)" {
                status.branch = Some(head.to_string());
            }
        } else if let Some(caps) = AHEAD_BEHIND.captures(line) {
            status.ahead = caps[1].parse().unwrap_or(0);
            status.behind = caps[2].parse().unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix("? ") {
            status.has_untracked = true;
            status.files.push(rest.to_string());
        } else if line.starts_with("1 ") || line.starts_with("2 ") {
            // "1 XY sub mH mI mW hH hI path" ("2 ..." adds a score and the
            // original path after a tab)
            let fields: Vec<&str> = line.splitn(9, ' ').collect();
            let xy = fields.get(1).copied().unwrap_or("..");
            let mut flags = xy.chars();
            if flags.next().is_some_and(|c| c != '.') {
                status.has_staged = true;
            }
            if flags.next().is_some_and(|c| c != '.') {
                status.has_modified = true;
            }
            let path_field = if line.starts_with("2 ") {
                line.splitn(10, ' ').nth(9)
            } else {
                fields.get(8).copied()
            };
            if let Some(path) = path_field {
                let path = path.split('\t').next().unwrap_or(path);
                status.files.push(path.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("u ") {
            status.has_modified = true;
            if let Some(path) = rest.splitn(10, ' ').nth(9) {
                status.files.push(path.to_string());
            }
        }
    }

    status.is_clean = !status.has_untracked && !status.has_staged && !status.has_modified;
    Ok(status)
}
