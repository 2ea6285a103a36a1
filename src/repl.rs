//! Interactive read-eval-print loop.
//!
//! Every submitted line (or brace-balanced group of lines) is compiled into its
//! own chunk and run on one long-lived `Vm`, so globals carry over between
//! entries while locals never do.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use crate::bytecode::{disassemble_chunk, InterpretResult, Vm};
use crate::config::VmOptions;

const HISTORY_FILE: &str = ".ferrule_history";

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplAction {
    Continue,
    Exit,
}

pub struct Repl {
    vm: Vm,
    options: VmOptions,
    history: Vec<String>,
    history_file: Option<PathBuf>,
    multiline_buffer: String,
    brace_balance: i32,
    show_bytecode: bool,
}

impl Repl {
    pub fn new(options: VmOptions) -> Self {
        let mut repl = Self::with_vm(Vm::new().with_options(options));
        repl.history_file = Some(Self::history_path());
        repl.load_history();
        repl
    }

    /// A REPL around an existing VM, without a history file.
    pub fn with_vm(vm: Vm) -> Self {
        let options = vm.options();
        Self {
            vm,
            options,
            history: Vec::new(),
            history_file: None,
            multiline_buffer: String::new(),
            brace_balance: 0,
            show_bytecode: false,
        }
    }

    fn history_path() -> PathBuf {
        match dirs::home_dir() {
            Some(home) => home.join(HISTORY_FILE),
            None => PathBuf::from(HISTORY_FILE),
        }
    }

    fn load_history(&mut self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Ok(content) = std::fs::read_to_string(path) {
            self.history = content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    fn save_history(&self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Err(e) = std::fs::write(path, self.history.join("\n")) {
            tracing::debug!(path = %path.display(), error = %e, "could not save history");
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        println!("{}", "Ferrule REPL".bold());
        println!("Type .help for available commands.\n");

        let stdin = io::stdin();
        let mut input = stdin.lock();

        loop {
            print!("{}", self.prompt());
            io::stdout().flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                println!();
                break;
            }

            if self.handle_line(line.trim_end()) == ReplAction::Exit {
                break;
            }
        }

        self.save_history();
        Ok(())
    }

    fn prompt(&self) -> String {
        if self.is_multiline() {
            format!("{} ", "...".dimmed())
        } else {
            format!("{} ", ">".green().bold())
        }
    }

    pub fn is_multiline(&self) -> bool {
        !self.multiline_buffer.is_empty()
    }

    /// Handle one line of input.
    pub fn handle_line(&mut self, line: &str) -> ReplAction {
        if self.is_multiline() {
            if line == ".break" {
                self.multiline_buffer.clear();
                self.brace_balance = 0;
                println!("(cancelled)");
                return ReplAction::Continue;
            }
            self.multiline_buffer.push('\n');
            self.multiline_buffer.push_str(line);
            self.brace_balance += count_braces(line);
            if self.brace_balance <= 0 {
                let code = std::mem::take(&mut self.multiline_buffer);
                self.brace_balance = 0;
                self.execute(&code);
            }
            return ReplAction::Continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplAction::Continue;
        }
        self.history.push(trimmed.to_string());

        if trimmed == "exit" || trimmed == "quit" {
            return ReplAction::Exit;
        }
        if trimmed.starts_with('.') {
            return self.handle_command(trimmed);
        }

        let balance = count_braces(trimmed);
        if balance > 0 {
            self.multiline_buffer = trimmed.to_string();
            self.brace_balance = balance;
            return ReplAction::Continue;
        }

        self.execute(trimmed);
        ReplAction::Continue
    }

    fn handle_command(&mut self, command: &str) -> ReplAction {
        match command {
            ".exit" | ".quit" => return ReplAction::Exit,
            ".help" => print_help(),
            ".vars" => {
                let names = self.vm.global_names();
                if names.is_empty() {
                    println!("No variables defined.");
                } else {
                    for name in names {
                        let value = self.vm.global(name).map(|v| v.to_string()).unwrap_or_default();
                        println!("  {} = {}", name.cyan(), value);
                    }
                }
            }
            ".clear" => {
                self.vm.reset_globals();
                println!("Environment reset.");
            }
            ".history" => {
                for (i, entry) in self.history.iter().enumerate() {
                    println!("{:4}  {}", i + 1, entry);
                }
            }
            ".bytecode" => {
                self.show_bytecode = !self.show_bytecode;
                println!(
                    "Bytecode listing {}.",
                    if self.show_bytecode { "on" } else { "off" }
                );
            }
            ".trace" => {
                self.options.trace_execution = !self.options.trace_execution;
                self.vm.set_options(self.options);
                println!(
                    "Execution tracing {} (visible with FERRULE_LOG=trace).",
                    if self.options.trace_execution { "on" } else { "off" }
                );
            }
            _ => println!("Unknown command: {}. Type .help for available commands.", command),
        }
        ReplAction::Continue
    }

    fn execute(&mut self, source: &str) -> InterpretResult {
        if self.show_bytecode {
            if let Ok(chunk) = crate::compile_source(source) {
                print!("{}", disassemble_chunk(&chunk, "repl"));
            }
        }
        crate::interpret(&mut self.vm, source)
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }
}

fn print_help() {
    println!();
    println!("{}", "Ferrule REPL Commands".bold());
    println!();
    println!(".help       - Show this help message");
    println!(".vars       - List global variables");
    println!(".clear      - Forget all globals");
    println!(".history    - Show input history");
    println!(".bytecode   - Toggle bytecode listing before each run");
    println!(".trace      - Toggle per-instruction tracing");
    println!(".break      - Cancel multi-line input");
    println!("exit        - Leave the REPL (or Ctrl+D)");
    println!();
}

/// `{` minus `}` outside string literals and `//` comments.
fn count_braces(s: &str) -> i32 {
    let mut balance = 0;
    let mut in_string = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_string = !in_string,
            '/' if !in_string && chars.peek() == Some(&'/') => break,
            '{' if !in_string => balance += 1,
            '}' if !in_string => balance -= 1,
            _ => {}
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Value;
    use crate::error::CollectingReporter;
    use crate::output::CaptureSink;
    use pretty_assertions::assert_eq;

    fn test_repl() -> (Repl, CaptureSink, CollectingReporter) {
        let sink = CaptureSink::new();
        let reporter = CollectingReporter::new();
        let vm = Vm::with_io(Box::new(sink.clone()), Box::new(reporter.clone()));
        (Repl::with_vm(vm), sink, reporter)
    }

    #[test]
    fn test_count_braces_ignores_strings() {
        assert_eq!(count_braces("{ {"), 2);
        assert_eq!(count_braces("}"), -1);
        assert_eq!(count_braces("print \"{\";"), 0);
        assert_eq!(count_braces("print 1; // {"), 0);
        assert_eq!(count_braces("{ // }"), 1);
        assert_eq!(count_braces("print \"//\"; {"), 1);
    }

    #[test]
    fn test_globals_persist_across_lines() {
        let (mut repl, sink, _) = test_repl();
        repl.handle_line("var a = 2;");
        repl.handle_line("a = a * 21;");
        repl.handle_line("print a;");
        assert_eq!(sink.lines(), vec!["42"]);
    }

    #[test]
    fn test_multiline_block_runs_when_balanced() {
        let (mut repl, sink, _) = test_repl();
        repl.handle_line("{");
        assert!(repl.is_multiline());
        repl.handle_line("  var x = 1;");
        repl.handle_line("  print x;");
        assert!(sink.lines().is_empty());
        repl.handle_line("}");
        assert!(!repl.is_multiline());
        assert_eq!(sink.lines(), vec!["1"]);
    }

    #[test]
    fn test_trailing_comment_brace_runs_immediately() {
        let (mut repl, sink, _) = test_repl();
        repl.handle_line("print 1; // {");
        assert!(!repl.is_multiline());
        assert_eq!(sink.lines(), vec!["1"]);
    }

    #[test]
    fn test_break_cancels_multiline() {
        let (mut repl, sink, _) = test_repl();
        repl.handle_line("while (true) {");
        repl.handle_line(".break");
        assert!(!repl.is_multiline());
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let (mut repl, sink, reporter) = test_repl();
        assert_eq!(repl.handle_line("print missing;"), ReplAction::Continue);
        assert_eq!(repl.handle_line("print (;"), ReplAction::Continue);
        repl.handle_line("print 1;");
        assert_eq!(reporter.entries().len(), 2);
        assert_eq!(sink.lines(), vec!["1"]);
    }

    #[test]
    fn test_commands() {
        let (mut repl, _, _) = test_repl();
        repl.handle_line("var a = 1;");
        assert_eq!(repl.vm().global("a"), Some(&Value::Number(1.0)));
        repl.handle_line(".clear");
        assert_eq!(repl.vm().global("a"), None);
        assert_eq!(repl.handle_line(".exit"), ReplAction::Exit);
        assert_eq!(repl.handle_line("quit"), ReplAction::Exit);
    }
}
