//! # Output
//!
//! Color and emoji control for CLI output, plus the renderers shared by the
//! commands: one-line node statuses and traversal summaries.
//!
//! Colors follow `--color`; in `auto` mode `NO_COLOR`, `CLICOLOR`,
//! `CLICOLOR_FORCE` and `TERM=dumb` are honored before the terminal is asked.
//! Without colors, emojis fall back to bracketed tags such as `[OK]`.

use std::env;

use console::style;

use crate::engine::OperationSummary;
use crate::git::GitStatus;
use crate::path::TreePath;

/// Whether output may use colors and emojis
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Decide from the `--color` flag (`always`, `never`, `auto`).
    ///
    /// `auto` honors `NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE` and
    /// `TERM=dumb` before asking the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors (https://no-color.org/)
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One line describing a node's working copy, e.g. `/team/api  main  clean`.
pub fn status_line(config: &OutputConfig, path: &TreePath, status: &GitStatus) -> String {
    let branch = status.branch.as_deref().unwrap_or("(detached)");
    let mut flags = Vec::new();
    if status.has_staged {
        flags.push("staged");
    }
    if status.has_modified {
        flags.push("modified");
    }
    if status.has_untracked {
        flags.push("untracked");
    }
    let state = if status.is_clean {
        "clean".to_string()
    } else {
        flags.join(", ")
    };

    let mut line = if config.use_color {
        let state = if status.is_clean {
            style(state).green()
        } else {
            style(state).yellow()
        };
        format!("{}  {}  {}", style(path).bold(), style(branch).cyan(), state)
    } else {
        format!("{}  {}  {}", path, branch, state)
    };
    if status.ahead > 0 {
        line.push_str(&format!("  ahead {}", status.ahead));
    }
    if status.behind > 0 {
        line.push_str(&format!("  behind {}", status.behind));
    }
    line
}

/// Print the outcome of a traversal: failures, warnings and the count line.
pub fn print_summary(config: &OutputConfig, verb: &str, summary: &OperationSummary) {
    for failure in &summary.failures {
        eprintln!(
            "{} {}: {}",
            emoji(config, "❌", "[FAIL]"),
            failure.path,
            failure.error
        );
    }
    for warning in &summary.warnings {
        eprintln!("{} {}", emoji(config, "⚠️ ", "[WARN]"), warning);
    }
    if summary.cancelled {
        eprintln!("{} {} interrupted", emoji(config, "⏹️ ", "[STOP]"), verb);
    }

    let marker = if summary.has_failures() {
        emoji(config, "⚠️ ", "[DONE]")
    } else {
        emoji(config, "✅", "[DONE]")
    };
    let mut line = format!("{} {}: {}", marker, verb, summary.summary_line());
    if summary.skipped > 0 {
        line.push_str(&format!(", {} skipped", summary.skipped));
    }
    println!("{}", line);
}
