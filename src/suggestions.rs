//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grove::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("No workspace found from {}", dir.display());
//!
//! // Use:
//! return Err(suggestions::workspace_not_found(dir));
//! ```

use std::path::Path;

use crate::defaults::{DEFAULT_CONFIG_FILENAME, WORKSPACE_ENV};
use crate::error::Error;

/// Generate an error for when no workspace document is found.
///
/// Includes hints about:
/// - Creating a workspace with `grove init`
/// - Using the --workspace flag
/// - Using the GROVE_WORKSPACE environment variable
pub fn workspace_not_found(start: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No grove workspace found from {start}\n\n\
         hint: Run 'grove init' to create a {file} here\n\
         hint: Use --workspace to point at an existing workspace\n\
         hint: Set {env} environment variable",
        start = start.display(),
        file = DEFAULT_CONFIG_FILENAME,
        env = WORKSPACE_ENV,
    )
}

/// Hint for an unknown node name, suggesting the closest sibling.
///
/// Falls back to listing the available names when nothing is close.
pub fn node_hint(name: &str, siblings: &[&str]) -> Option<String> {
    if let Some(similar) = find_similar(name, siblings) {
        return Some(format!("Did you mean '{similar}'?"));
    }
    if siblings.is_empty() {
        return None;
    }
    Some(format!("Available here: {}", siblings.join(", ")))
}

/// Generate an error for a cycle between config references.
///
/// Includes hints about how to resolve the cycle.
pub fn cycle_detected(cycle: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Cycle detected in config references: {cycle}\n\n\
         hint: Remove one of the 'file:' entries to break the cycle\n\
         hint: A referenced document must not point back at one of its ancestors"
    )
}

/// Generate an error for a clone target that is already occupied.
pub fn clone_conflict(path: &Path, message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Cannot clone into {path}: {message}\n\n\
         hint: Move the existing directory away and run 'grove clone' again\n\
         hint: Or remove the node with 'grove remove' if it is no longer needed",
        path = path.display()
    )
}

/// Convert a library error into a CLI error, attaching hints where one helps.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::CycleDetected { cycle } => cycle_detected(&cycle),
        Error::CloneConflict { path, message } => clone_conflict(&path, &message),
        Error::NotInitialized { message } => anyhow::anyhow!(
            "Workspace not initialized: {message}\n\n\
             hint: Run 'grove init' to create a workspace"
        ),
        other => anyhow::Error::new(other),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
pub fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut previous: Vec<usize> = (0..=b_len).collect();
    let mut row = vec![0usize; b_len + 1];

    for i in 1..=a_len {
        row[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            row[j] = (previous[j] + 1)
                .min(row[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut row);
    }

    previous[b_len]
}
