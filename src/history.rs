//! Append-only interaction log with a bounded rendering window.

/// Ordered log of issued commands and their outputs.
///
/// Entries are never evicted. Only the most recent `window` entries are
/// surfaced to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct History {
    entries: Vec<String>,
    window: usize,
}

impl History {
    /// Create an empty history that renders at most `window` entries.
    pub fn new(window: usize) -> Self {
        Self {
            entries: Vec::new(),
            window,
        }
    }

    /// Record the command chosen for a 1-based step number.
    pub fn push_command(&mut self, step: u32, command: &str) {
        self.entries.push(format!("Step {step}: {command}"));
    }

    /// Record a command's output, trimmed.
    pub fn push_output(&mut self, output: &str) {
        self.entries.push(format!("Output: {}", output.trim()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Full underlying buffer, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The most recent entries that fit in the window, oldest first.
    pub fn window(&self) -> &[String] {
        let start = self.entries.len().saturating_sub(self.window);
        &self.entries[start..]
    }

    /// Window entries joined by newlines.
    pub fn render(&self) -> String {
        self.window().join("\n")
    }
}
