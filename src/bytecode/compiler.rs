//! AST-to-bytecode compiler.
//!
//! Single-pass compilation: walks the AST once, emitting bytecode into a `Chunk`.
//! Variable resolution happens at compile time. A local's slot in `locals` is
//! also its position on the VM stack, so block-scoped variables never touch
//! the global table.

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{Program, Stmt};
use crate::error::CompileError;

use super::chunk::Chunk;
use super::instruction::OpCode;
use super::value::Value;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Constant indices are a single byte.
pub const MAX_CONSTANTS: usize = 256;
/// Local slots are a single byte. Locals share the VM's `STACK_MAX` slots
/// with temporaries, so a block holding all 256 compiles but overflows the
/// stack on its next push, which the VM reports as a fault.
pub const MAX_LOCALS: usize = 256;
/// Largest distance a 16-bit jump operand can encode.
pub const MAX_JUMP: usize = u16::MAX as usize;

/// Hidden local holding a `for` loop's limit. Not a valid identifier, so
/// source code can never name it.
pub(crate) const FOR_LIMIT_SLOT: &str = "$limit";

/// A local variable tracked during compilation.
#[derive(Debug, Clone)]
pub struct Local {
    pub name: String,
    pub depth: usize,
}

/// How a name is reached at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableAccess {
    /// Stack slot.
    Local(u8),
    /// Index of the name's string constant.
    Global(u8),
}

/// The compiler: transforms AST into bytecode.
pub struct Compiler {
    chunk: Chunk,
    /// Locals in declaration order, innermost last.
    locals: Vec<Local>,
    /// Current scope depth (0 = global).
    scope_depth: usize,
    /// Constant index of every identifier name already in the pool.
    names: HashMap<String, u8>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            chunk: Chunk::new(),
            locals: Vec::new(),
            scope_depth: 0,
            names: HashMap::new(),
        }
    }

    /// Compile a full program.
    pub fn compile(program: &Program) -> CompileResult<Chunk> {
        Self::compile_statements(&program.statements)
    }

    /// Compile a statement list into a chunk ending in `NIL RETURN`.
    pub fn compile_statements(statements: &[Stmt]) -> CompileResult<Chunk> {
        let mut compiler = Compiler::new();
        for stmt in statements {
            compiler.compile_stmt(stmt)?;
        }

        let line = statements.last().map(|s| s.span.line).unwrap_or(0);
        compiler.emit(OpCode::Nil, line);
        compiler.emit(OpCode::Return, line);

        debug!(
            statements = statements.len(),
            bytes = compiler.chunk.len(),
            constants = compiler.chunk.constants().len(),
            "compiled chunk"
        );
        Ok(compiler.chunk)
    }

    // --- Chunk helpers ---

    pub(crate) fn emit(&mut self, op: OpCode, line: usize) {
        self.chunk.write_op(op, line);
    }

    pub(crate) fn emit_with_operand(&mut self, op: OpCode, operand: u8, line: usize) {
        self.chunk.write_op(op, line);
        self.chunk.write(operand, line);
    }

    pub(crate) fn current_offset(&self) -> usize {
        self.chunk.len()
    }

    pub(crate) fn make_constant(&mut self, value: Value, line: usize) -> CompileResult<u8> {
        if self.chunk.constants().len() >= MAX_CONSTANTS {
            return Err(CompileError::TooManyConstants { line });
        }
        let index = self.chunk.add_constant(value);
        Ok(index as u8)
    }

    pub(crate) fn emit_constant(&mut self, value: Value, line: usize) -> CompileResult<()> {
        let index = self.make_constant(value, line)?;
        self.emit_with_operand(OpCode::Constant, index, line);
        Ok(())
    }

    /// Constant holding an identifier's name, shared by every reference to it.
    pub(crate) fn identifier_constant(&mut self, name: &str, line: usize) -> CompileResult<u8> {
        if let Some(&index) = self.names.get(name) {
            return Ok(index);
        }
        let index = self.make_constant(Value::String(name.to_string()), line)?;
        self.names.insert(name.to_string(), index);
        Ok(index)
    }

    /// Emit a jump with a placeholder operand and return the operand's offset.
    pub(crate) fn emit_jump(&mut self, op: OpCode, line: usize) -> usize {
        self.emit(op, line);
        self.chunk.write_u16(0xFFFF, line);
        self.chunk.len() - 2
    }

    /// Point the jump whose operand sits at `offset` to the current end of the chunk.
    pub(crate) fn patch_jump(&mut self, offset: usize, line: usize) -> CompileResult<()> {
        let distance = self.chunk.len() - offset - 2;
        if distance > MAX_JUMP {
            return Err(CompileError::JumpTooFar { distance, line });
        }
        self.chunk.patch_u16(offset, distance as u16);
        Ok(())
    }

    pub(crate) fn emit_loop(&mut self, loop_start: usize, line: usize) -> CompileResult<()> {
        self.emit(OpCode::Loop, line);
        // +2 skips the operand itself, which the VM has read before jumping.
        let distance = self.chunk.len() - loop_start + 2;
        if distance > MAX_JUMP {
            return Err(CompileError::JumpTooFar { distance, line });
        }
        self.chunk.write_u16(distance as u16, line);
        Ok(())
    }

    // --- Scope management ---

    pub(crate) fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    pub(crate) fn end_scope(&mut self, line: usize) {
        self.scope_depth -= 1;
        while let Some(local) = self.locals.last() {
            if local.depth <= self.scope_depth {
                break;
            }
            self.emit(OpCode::Pop, line);
            self.locals.pop();
        }
    }

    pub(crate) fn scope_depth(&self) -> usize {
        self.scope_depth
    }

    // --- Variables ---

    /// Claim the next stack slot. The value must already be on the stack.
    pub(crate) fn add_local(&mut self, name: &str, line: usize) -> CompileResult<u8> {
        if self.locals.len() >= MAX_LOCALS {
            return Err(CompileError::TooManyLocals { line });
        }
        self.locals.push(Local {
            name: name.to_string(),
            depth: self.scope_depth,
        });
        Ok((self.locals.len() - 1) as u8)
    }

    /// Newest declaration wins, which gives inner scopes shadowing.
    pub(crate) fn resolve_local(&self, name: &str) -> Option<u8> {
        self.locals
            .iter()
            .rposition(|local| local.name == name)
            .map(|slot| slot as u8)
    }

    pub(crate) fn resolve_variable(&mut self, name: &str, line: usize) -> CompileResult<VariableAccess> {
        match self.resolve_local(name) {
            Some(slot) => Ok(VariableAccess::Local(slot)),
            None => Ok(VariableAccess::Global(self.identifier_constant(name, line)?)),
        }
    }

    #[cfg(test)]
    pub(crate) fn locals(&self) -> &[Local] {
        &self.locals
    }

    #[cfg(test)]
    pub(crate) fn chunk(&self) -> &Chunk {
        &self.chunk
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::span::Span;
    use pretty_assertions::assert_eq;

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt::new(kind, Span::at_line(1))
    }

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::at_line(1))
    }

    fn var(name: &str, init: Option<Expr>) -> Stmt {
        stmt(StmtKind::Var {
            name: name.to_string(),
            type_annotation: None,
            initializer: init,
        })
    }

    #[test]
    fn test_global_var_bytes() {
        let chunk = Compiler::compile_statements(&[var(
            "x",
            Some(expr(ExprKind::NumberLiteral(1.0))),
        )])
        .unwrap();

        assert_eq!(
            chunk.code(),
            &[
                OpCode::Constant as u8,
                0,
                OpCode::DefineGlobal as u8,
                1,
                OpCode::Nil as u8,
                OpCode::Return as u8,
            ]
        );
        assert_eq!(
            chunk.constants(),
            &[Value::Number(1.0), Value::String("x".to_string())]
        );
    }

    #[test]
    fn test_literals_use_dedicated_opcodes() {
        let chunk = Compiler::compile_statements(&[
            stmt(StmtKind::Print(expr(ExprKind::Nil))),
            stmt(StmtKind::Print(expr(ExprKind::BoolLiteral(true)))),
            stmt(StmtKind::Print(expr(ExprKind::BoolLiteral(false)))),
        ])
        .unwrap();

        assert!(chunk.constants().is_empty());
        assert_eq!(
            chunk.code(),
            &[
                OpCode::Nil as u8,
                OpCode::Print as u8,
                OpCode::True as u8,
                OpCode::Print as u8,
                OpCode::False as u8,
                OpCode::Print as u8,
                OpCode::Nil as u8,
                OpCode::Return as u8,
            ]
        );
    }

    #[test]
    fn test_identifier_names_are_interned() {
        let get = |name: &str| stmt(StmtKind::Print(expr(ExprKind::Variable(name.to_string()))));
        let chunk = Compiler::compile_statements(&[get("a"), get("a"), get("b"), get("a")]).unwrap();
        assert_eq!(
            chunk.constants(),
            &[Value::String("a".to_string()), Value::String("b".to_string())]
        );
    }

    #[test]
    fn test_scope_reclamation() {
        let mut compiler = Compiler::new();
        let block = stmt(StmtKind::Block(vec![
            var("x", Some(expr(ExprKind::NumberLiteral(1.0)))),
            var("y", None),
        ]));
        compiler.compile_stmt(&block).unwrap();

        assert!(compiler.locals().is_empty());
        assert_eq!(compiler.scope_depth(), 0);
        let code = compiler.chunk().code();
        assert_eq!(
            &code[code.len() - 2..],
            &[OpCode::Pop as u8, OpCode::Pop as u8]
        );
    }

    #[test]
    fn test_shadowing_resolves_newest_slot() {
        let mut compiler = Compiler::new();
        compiler.begin_scope();
        compiler.add_local("x", 1).unwrap();
        compiler.begin_scope();
        compiler.add_local("y", 1).unwrap();
        compiler.add_local("x", 1).unwrap();

        assert_eq!(compiler.resolve_local("x"), Some(2));
        assert_eq!(compiler.resolve_local("y"), Some(1));
        assert_eq!(compiler.resolve_local("z"), None);

        compiler.end_scope(1);
        assert_eq!(compiler.resolve_local("x"), Some(0));
    }

    #[test]
    fn test_too_many_locals() {
        let locals: Vec<Stmt> = (0..=MAX_LOCALS).map(|i| var(&format!("v{}", i), None)).collect();
        let err = Compiler::compile_statements(&[stmt(StmtKind::Block(locals))]).unwrap_err();
        assert_eq!(err, CompileError::TooManyLocals { line: 1 });
    }

    #[test]
    fn test_exactly_max_locals_compiles() {
        let locals: Vec<Stmt> = (0..MAX_LOCALS).map(|i| var(&format!("v{}", i), None)).collect();
        assert!(Compiler::compile_statements(&[stmt(StmtKind::Block(locals))]).is_ok());
    }

    #[test]
    fn test_too_many_constants() {
        let prints: Vec<Stmt> = (0..=MAX_CONSTANTS)
            .map(|i| stmt(StmtKind::Print(expr(ExprKind::NumberLiteral(i as f64)))))
            .collect();
        let err = Compiler::compile_statements(&prints).unwrap_err();
        assert_eq!(err, CompileError::TooManyConstants { line: 1 });
    }

    #[test]
    fn test_jump_patching() {
        let mut compiler = Compiler::new();
        let jump = compiler.emit_jump(OpCode::JumpIfFalse, 1);
        compiler.emit(OpCode::Pop, 1);
        compiler.emit(OpCode::Pop, 1);
        compiler.patch_jump(jump, 1).unwrap();

        assert_eq!(compiler.chunk().read_u16(jump), Some(2));
    }

    #[test]
    fn test_loop_offset_lands_on_start() {
        let mut compiler = Compiler::new();
        compiler.emit(OpCode::Nil, 1);
        let loop_start = compiler.current_offset();
        compiler.emit(OpCode::True, 1);
        compiler.emit(OpCode::Pop, 1);
        compiler.emit_loop(loop_start, 1).unwrap();

        let operand_at = compiler.current_offset() - 2;
        let offset = compiler.chunk().read_u16(operand_at).unwrap() as usize;
        assert_eq!(compiler.current_offset() - offset, loop_start);
    }

    #[test]
    fn test_jump_too_far() {
        let mut compiler = Compiler::new();
        let jump = compiler.emit_jump(OpCode::Jump, 3);
        for _ in 0..=MAX_JUMP {
            compiler.emit(OpCode::Nil, 3);
        }
        let err = compiler.patch_jump(jump, 3).unwrap_err();
        assert_eq!(
            err,
            CompileError::JumpTooFar {
                distance: MAX_JUMP + 1,
                line: 3
            }
        );
    }
}
