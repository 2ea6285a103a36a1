//! The bytecode virtual machine: stack-based execution engine.
//!
//! One `Vm` runs one chunk at a time. The operand stack and instruction pointer
//! are reset by every `interpret` call while the global table survives, which
//! is what lets a REPL define a variable on one line and read it on the next.

use std::collections::HashMap;

use tracing::{debug, error, trace, warn};

use crate::config::VmOptions;
use crate::error::{ConsoleReporter, ErrorReporter, RuntimeError};
use crate::output::{PrintSink, StdoutSink};

use super::chunk::Chunk;
use super::disassembler::disassemble_instruction;
use super::instruction::OpCode;
use super::value::Value;

/// Operand stack capacity.
pub const STACK_MAX: usize = 256;

/// Outcome of running a program through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError,
}

/// The bytecode VM.
pub struct Vm {
    /// Value stack. Slot `n` of a chunk's locals lives at `stack[n]`.
    stack: Vec<Value>,
    /// Global variables, kept across `interpret` calls.
    globals: HashMap<String, Value>,
    /// Offset of the next byte to read.
    ip: usize,
    options: VmOptions,
    output: Box<dyn PrintSink>,
    reporter: Box<dyn ErrorReporter>,
}

impl Vm {
    /// A VM printing to stdout and reporting to stderr.
    pub fn new() -> Self {
        Self::with_io(Box::new(StdoutSink), Box::new(ConsoleReporter::new()))
    }

    pub fn with_io(output: Box<dyn PrintSink>, reporter: Box<dyn ErrorReporter>) -> Self {
        Self {
            stack: Vec::with_capacity(STACK_MAX),
            globals: HashMap::new(),
            ip: 0,
            options: VmOptions::default(),
            output,
            reporter,
        }
    }

    pub fn with_options(mut self, options: VmOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: VmOptions) {
        self.options = options;
    }

    pub fn options(&self) -> VmOptions {
        self.options
    }

    /// Execute a chunk from its first byte. Runtime errors are reported
    /// through the VM's reporter before returning.
    pub fn interpret(&mut self, chunk: &Chunk) -> InterpretResult {
        match self.execute(chunk) {
            Ok(()) => InterpretResult::Ok,
            Err(err) => {
                if err.is_fault() {
                    error!(line = err.line(), "{}", err);
                } else {
                    warn!(line = err.line(), "{}", err);
                }
                self.report(err.line(), &err.to_string());
                InterpretResult::RuntimeError
            }
        }
    }

    /// Execute a chunk, returning the runtime error instead of reporting it.
    pub fn execute(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        self.stack.clear();
        self.ip = 0;
        debug!(bytes = chunk.len(), globals = self.globals.len(), "vm start");
        self.run(chunk)
    }

    /// Forward a diagnostic to the VM's reporter.
    pub fn report(&mut self, line: usize, message: &str) {
        self.reporter.report(line, message);
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Names of all defined globals, sorted.
    pub fn global_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.globals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Forget every global.
    pub fn reset_globals(&mut self) {
        self.globals.clear();
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Run the dispatch loop.
    fn run(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        let mut executed: u64 = 0;

        loop {
            let offset = self.ip;
            let line = chunk.get_line(offset);

            if let Some(limit) = self.options.max_instructions {
                if executed >= limit {
                    return Err(RuntimeError::BudgetExhausted { limit, line });
                }
            }
            executed += 1;

            if self.options.trace_execution {
                self.trace_instruction(chunk, offset);
            }

            let byte = self.read_byte(chunk, line)?;
            let op = OpCode::from_u8(byte).ok_or_else(|| {
                RuntimeError::malformed(format!("unknown opcode {} at offset {}", byte, offset), line)
            })?;

            match op {
                OpCode::Constant => {
                    let value = self.read_constant(chunk, line)?.clone();
                    self.push(value, line)?;
                }
                OpCode::Nil => self.push(Value::Nil, line)?,
                OpCode::True => self.push(Value::Bool(true), line)?,
                OpCode::False => self.push(Value::Bool(false), line)?,

                OpCode::Pop => {
                    self.pop(line)?;
                }

                OpCode::GetLocal => {
                    let slot = self.read_byte(chunk, line)? as usize;
                    let value = self.slot(slot, line)?.clone();
                    self.push(value, line)?;
                }
                OpCode::SetLocal => {
                    let slot = self.read_byte(chunk, line)? as usize;
                    let value = self.peek(0, line)?.clone();
                    *self.slot_mut(slot, line)? = value;
                }

                OpCode::GetGlobal => {
                    let name = self.read_name(chunk, line)?;
                    let value = self
                        .globals
                        .get(name)
                        .cloned()
                        .ok_or_else(|| RuntimeError::undefined_variable(name, line))?;
                    self.push(value, line)?;
                }
                OpCode::DefineGlobal => {
                    let name = self.read_name(chunk, line)?;
                    let value = self.pop(line)?;
                    self.globals.insert(name.to_string(), value);
                }
                OpCode::SetGlobal => {
                    let name = self.read_name(chunk, line)?;
                    let value = self.peek(0, line)?.clone();
                    match self.globals.get_mut(name) {
                        Some(slot) => *slot = value,
                        None => return Err(RuntimeError::undefined_variable(name, line)),
                    }
                }

                // --- Arithmetic ---
                OpCode::Add => self.binary_number(line, |a, b| Value::Number(a + b))?,
                OpCode::Subtract => self.binary_number(line, |a, b| Value::Number(a - b))?,
                OpCode::Multiply => self.binary_number(line, |a, b| Value::Number(a * b))?,
                OpCode::Divide => self.binary_number(line, |a, b| Value::Number(a / b))?,
                OpCode::Negate => {
                    let value = self.pop(line)?;
                    match value {
                        Value::Number(n) => self.push(Value::Number(-n), line)?,
                        other => {
                            return Err(RuntimeError::type_error(
                                format!("Cannot negate {}", other.type_name()),
                                line,
                            ));
                        }
                    }
                }

                // --- Comparison ---
                OpCode::Equal => {
                    let b = self.pop(line)?;
                    let a = self.pop(line)?;
                    self.push(Value::Bool(a == b), line)?;
                }
                OpCode::Greater => self.binary_number(line, |a, b| Value::Bool(a > b))?,
                OpCode::Less => self.binary_number(line, |a, b| Value::Bool(a < b))?,
                OpCode::Not => {
                    let value = self.pop(line)?;
                    self.push(Value::Bool(value.is_falsy()), line)?;
                }

                // --- Control flow ---
                OpCode::Jump => {
                    let jump = self.read_u16(chunk, line)? as usize;
                    self.ip += jump;
                }
                OpCode::JumpIfFalse => {
                    // The condition stays on the stack; compiled code pops it on both paths.
                    let jump = self.read_u16(chunk, line)? as usize;
                    if self.peek(0, line)?.is_falsy() {
                        self.ip += jump;
                    }
                }
                OpCode::Loop => {
                    let jump = self.read_u16(chunk, line)? as usize;
                    self.ip = self.ip.checked_sub(jump).ok_or_else(|| {
                        RuntimeError::malformed(format!("loop before chunk start at offset {}", offset), line)
                    })?;
                }

                OpCode::Print => {
                    let value = self.pop(line)?;
                    self.output.print(&value.to_string());
                }
                OpCode::Return => {
                    self.pop(line)?;
                    return Ok(());
                }
            }
        }
    }

    // --- Stack operations ---

    #[inline]
    fn push(&mut self, value: Value, line: usize) -> Result<(), RuntimeError> {
        if self.stack.len() >= STACK_MAX {
            return Err(RuntimeError::StackOverflow { line });
        }
        self.stack.push(value);
        Ok(())
    }

    #[inline]
    fn pop(&mut self, line: usize) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow { line })
    }

    #[inline]
    fn peek(&self, distance: usize, line: usize) -> Result<&Value, RuntimeError> {
        self.stack
            .len()
            .checked_sub(1 + distance)
            .and_then(|index| self.stack.get(index))
            .ok_or(RuntimeError::StackUnderflow { line })
    }

    fn slot(&self, slot: usize, line: usize) -> Result<&Value, RuntimeError> {
        self.stack
            .get(slot)
            .ok_or_else(|| RuntimeError::malformed(format!("local slot {} is not on the stack", slot), line))
    }

    fn slot_mut(&mut self, slot: usize, line: usize) -> Result<&mut Value, RuntimeError> {
        self.stack
            .get_mut(slot)
            .ok_or_else(|| RuntimeError::malformed(format!("local slot {} is not on the stack", slot), line))
    }

    /// Pop two numbers, push `f(a, b)`.
    fn binary_number<F>(&mut self, line: usize, f: F) -> Result<(), RuntimeError>
    where
        F: FnOnce(f64, f64) -> Value,
    {
        let b = self.pop(line)?;
        let a = self.pop(line)?;
        match (&a, &b) {
            (Value::Number(x), Value::Number(y)) => self.push(f(*x, *y), line),
            _ => Err(RuntimeError::type_error(
                format!(
                    "Operands must be numbers, got {} and {}",
                    a.type_name(),
                    b.type_name()
                ),
                line,
            )),
        }
    }

    // --- Bytecode reading ---

    fn read_byte(&mut self, chunk: &Chunk, line: usize) -> Result<u8, RuntimeError> {
        let byte = chunk.code().get(self.ip).copied().ok_or_else(|| {
            RuntimeError::malformed(format!("read past end of chunk at offset {}", self.ip), line)
        })?;
        self.ip += 1;
        Ok(byte)
    }

    fn read_u16(&mut self, chunk: &Chunk, line: usize) -> Result<u16, RuntimeError> {
        let value = chunk.read_u16(self.ip).ok_or_else(|| {
            RuntimeError::malformed(format!("truncated jump operand at offset {}", self.ip), line)
        })?;
        self.ip += 2;
        Ok(value)
    }

    fn read_constant<'c>(&mut self, chunk: &'c Chunk, line: usize) -> Result<&'c Value, RuntimeError> {
        let index = self.read_byte(chunk, line)? as usize;
        chunk
            .constants()
            .get(index)
            .ok_or_else(|| RuntimeError::malformed(format!("constant {} out of range", index), line))
    }

    fn read_name<'c>(&mut self, chunk: &'c Chunk, line: usize) -> Result<&'c str, RuntimeError> {
        self.read_constant(chunk, line)?
            .as_str()
            .ok_or_else(|| RuntimeError::malformed("global name constant is not a string", line))
    }

    fn trace_instruction(&self, chunk: &Chunk, offset: usize) {
        let mut text = String::new();
        if offset < chunk.len() {
            disassemble_instruction(chunk, offset, &mut text);
        }
        let stack = self
            .stack
            .iter()
            .map(|v| format!("[ {} ]", v))
            .collect::<String>();
        trace!(offset, stack = %stack, "{}", text);
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
