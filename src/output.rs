//! Destinations for `print` output.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Receives the text of every executed `print` statement.
pub trait PrintSink {
    fn print(&mut self, text: &str);
}

/// Prints each value on its own line to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn print(&mut self, text: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout is not a program error.
        let _ = writeln!(handle, "{}", text);
    }
}

/// Captures printed lines in a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl PrintSink for CaptureSink {
    fn print(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }
}
