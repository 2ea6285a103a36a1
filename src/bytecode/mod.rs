//! Bytecode back end: a single-pass compiler from the AST to a flat `Chunk`,
//! and the stack VM that executes it.
//!
//! # Architecture
//!
//! - `value`: runtime values
//! - `instruction`: the opcode set and operand widths
//! - `chunk`: instruction bytes, constant pool and line table
//! - `compiler`: AST to bytecode, with compile-time local slot resolution
//! - `vm`: fetch-decode-execute loop over a chunk
//! - `disassembler`: human-readable listing of a chunk

pub mod chunk;
pub mod compiler;
mod compiler_exprs;
mod compiler_stmts;
pub mod disassembler;
pub mod instruction;
pub mod value;
pub mod vm;


pub use chunk::Chunk;
pub use compiler::Compiler;
pub use disassembler::{disassemble_chunk, disassemble_instruction};
pub use instruction::OpCode;
pub use value::Value;
pub use vm::{InterpretResult, Vm};
