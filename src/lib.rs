//! Ferrule: a small dynamically-typed scripting language compiled in a single
//! pass to bytecode and run on a stack VM.
//!
//! This is the library root that exports all modules and the pipeline entry
//! points.
//!
//! # Pipeline
//!
//! source → `lexer` → `parser` → `resolver` → `bytecode::Compiler` → `bytecode::Vm`

#![allow(clippy::module_inception)]
#![allow(clippy::new_without_default)]
#![allow(clippy::result_large_err)]

pub mod ast;
pub mod bytecode;
pub mod config;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod span;

use ast::Program;
use bytecode::{Chunk, Compiler, InterpretResult, Vm};
use error::FerruleError;

/// Lex, parse and resolve a program. Parse and resolve errors are collected
/// rather than stopping at the first one.
pub fn parse_source(source: &str) -> Result<Program, Vec<FerruleError>> {
    let tokens = lexer::Scanner::new(source)
        .scan_tokens()
        .map_err(|e| vec![e.into()])?;

    let program = parser::Parser::new(tokens)
        .parse()
        .map_err(|errors| errors.into_iter().map(FerruleError::from).collect::<Vec<_>>())?;

    resolver::Resolver::new()
        .resolve(&program)
        .map_err(|errors| errors.into_iter().map(FerruleError::from).collect::<Vec<_>>())?;

    Ok(program)
}

/// Run the whole front end and the compiler over `source`.
pub fn compile_source(source: &str) -> Result<Chunk, Vec<FerruleError>> {
    let program = parse_source(source)?;
    Compiler::compile(&program).map_err(|e| vec![e.into()])
}

/// Compile and execute `source` on an existing VM. Compile-phase errors are
/// sent to the VM's reporter and nothing runs.
pub fn interpret(vm: &mut Vm, source: &str) -> InterpretResult {
    match compile_source(source) {
        Ok(chunk) => vm.interpret(&chunk),
        Err(errors) => {
            for err in &errors {
                vm.report(err.line().unwrap_or(0), &err.to_string());
            }
            InterpretResult::CompileError
        }
    }
}

/// Run a program once on a fresh VM printing to stdout.
pub fn run(source: &str) -> Result<(), FerruleError> {
    let chunk = match compile_source(source) {
        Ok(chunk) => chunk,
        Err(errors) => {
            return match errors.into_iter().next() {
                Some(first) => Err(first),
                None => Ok(()),
            }
        }
    };

    let options = config::VmOptions::from_env();
    let mut vm = Vm::new().with_options(options);
    vm.execute(&chunk)?;
    Ok(())
}
