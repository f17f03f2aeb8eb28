//! Spinner shown while an operation walks the tree

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use grove::engine::{GitOperation, NodeOutcome, TraversalObserver};
use grove::output::{emoji, OutputConfig};
use grove::path::TreePath;

/// Prints one line per finished node and keeps a spinner on the current one
pub struct SpinnerObserver {
    bar: ProgressBar,
    output: OutputConfig,
}

impl SpinnerObserver {
    pub fn new(output: &OutputConfig) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar,
            output: output.clone(),
        }
    }

    /// Handle used to clear the spinner once the traversal returns.
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }

    fn line(&self, path: &TreePath, outcome: &NodeOutcome) -> String {
        match outcome {
            NodeOutcome::Succeeded => format!("{} {}", emoji(&self.output, "✅", "[OK]"), path),
            NodeOutcome::Skipped { reason } => format!(
                "{} {} ({})",
                emoji(&self.output, "⏭️ ", "[SKIP]"),
                path,
                reason
            ),
            NodeOutcome::Failed { message } => format!(
                "{} {}: {}",
                emoji(&self.output, "❌", "[FAIL]"),
                path,
                message
            ),
        }
    }
}

impl TraversalObserver for SpinnerObserver {
    fn node_started(&self, path: &TreePath, operation: &GitOperation) {
        self.bar.set_message(format!("{} {}", operation.name(), path));
    }

    fn node_finished(&self, path: &TreePath, outcome: &NodeOutcome) {
        let line = self.line(path, outcome);
        // A hidden bar swallows println, e.g. when stderr is not a terminal
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }
}
