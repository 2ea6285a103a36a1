//! Diagnostic sinks for compile and runtime errors.

use std::cell::RefCell;
use std::rc::Rc;

use colored::Colorize;

/// Receives `(line, message)` diagnostics from the pipeline.
pub trait ErrorReporter {
    fn report(&mut self, line: usize, message: &str);
}

/// Writes `[line N] Error: message` to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    reported: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of diagnostics written so far.
    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl ErrorReporter for ConsoleReporter {
    fn report(&mut self, line: usize, message: &str) {
        self.reported += 1;
        eprintln!(
            "{} {} {}",
            format!("[line {}]", line).dimmed(),
            "Error:".red().bold(),
            message
        );
    }
}

/// Records diagnostics in memory. Clones share the same buffer, so a test can
/// hand one clone to a `Vm` and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    entries: Rc<RefCell<Vec<(usize, String)>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(usize, String)> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&mut self, line: usize, message: &str) {
        self.entries.borrow_mut().push((line, message.to_string()));
    }
}
