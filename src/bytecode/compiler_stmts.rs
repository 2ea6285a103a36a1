//! Statement compilation: AST statements to bytecode.

use crate::ast::{Expr, Stmt, StmtKind};
use crate::bytecode::value::Value;

use super::compiler::{CompileResult, Compiler, FOR_LIMIT_SLOT};
use super::instruction::OpCode;

impl Compiler {
    /// Compile a statement. Apart from newly declared locals, the stack depth
    /// afterwards equals the depth before.
    pub fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        let line = stmt.span.line;
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.compile_expr(expr)?;
                self.emit(OpCode::Pop, line);
            }
            StmtKind::Print(expr) => {
                self.compile_expr(expr)?;
                self.emit(OpCode::Print, line);
            }
            StmtKind::Var {
                name, initializer, ..
            } => {
                self.compile_var(name, initializer.as_ref(), line)?;
            }
            StmtKind::Block(stmts) => {
                self.begin_scope();
                for s in stmts {
                    self.compile_stmt(s)?;
                }
                self.end_scope(line);
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.compile_if_stmt(condition, then_branch, else_branch.as_deref(), line)?;
            }
            StmtKind::While { condition, body } => {
                self.compile_while(condition, body, line)?;
            }
            StmtKind::For {
                variable,
                limit,
                body,
            } => {
                self.compile_for(variable, limit, body, line)?;
            }
        }
        Ok(())
    }

    fn compile_var(&mut self, name: &str, initializer: Option<&Expr>, line: usize) -> CompileResult<()> {
        match initializer {
            Some(init) => self.compile_expr(init)?,
            None => self.emit(OpCode::Nil, line),
        }

        if self.scope_depth() > 0 {
            // The initializer's value stays on the stack as the local's slot.
            self.add_local(name, line)?;
        } else {
            let index = self.identifier_constant(name, line)?;
            self.emit_with_operand(OpCode::DefineGlobal, index, line);
        }
        Ok(())
    }

    fn compile_if_stmt(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
        line: usize,
    ) -> CompileResult<()> {
        self.compile_expr(condition)?;
        let then_jump = self.emit_jump(OpCode::JumpIfFalse, line);
        self.emit(OpCode::Pop, line);
        self.compile_stmt(then_branch)?;

        let else_jump = self.emit_jump(OpCode::Jump, line);
        self.patch_jump(then_jump, line)?;
        self.emit(OpCode::Pop, line);
        if let Some(else_stmt) = else_branch {
            self.compile_stmt(else_stmt)?;
        }
        self.patch_jump(else_jump, line)?;
        Ok(())
    }

    fn compile_while(&mut self, condition: &Expr, body: &Stmt, line: usize) -> CompileResult<()> {
        let loop_start = self.current_offset();
        self.compile_expr(condition)?;

        let exit_jump = self.emit_jump(OpCode::JumpIfFalse, line);
        self.emit(OpCode::Pop, line);
        self.compile_stmt(body)?;
        self.emit_loop(loop_start, line)?;

        self.patch_jump(exit_jump, line)?;
        self.emit(OpCode::Pop, line);
        Ok(())
    }

    /// for i in limit body: runs body with i = 0, 1, ... while i < limit.
    fn compile_for(&mut self, variable: &str, limit: &Expr, body: &Stmt, line: usize) -> CompileResult<()> {
        self.begin_scope();

        self.compile_expr(limit)?;
        let limit_slot = self.add_local(FOR_LIMIT_SLOT, line)?;
        self.emit_constant(Value::Number(0.0), line)?;
        let counter_slot = self.add_local(variable, line)?;

        let loop_start = self.current_offset();
        self.emit_with_operand(OpCode::GetLocal, counter_slot, line);
        self.emit_with_operand(OpCode::GetLocal, limit_slot, line);
        self.emit(OpCode::Less, line);
        let exit_jump = self.emit_jump(OpCode::JumpIfFalse, line);
        self.emit(OpCode::Pop, line);

        self.compile_stmt(body)?;

        self.emit_with_operand(OpCode::GetLocal, counter_slot, line);
        self.emit_constant(Value::Number(1.0), line)?;
        self.emit(OpCode::Add, line);
        self.emit_with_operand(OpCode::SetLocal, counter_slot, line);
        self.emit(OpCode::Pop, line);
        self.emit_loop(loop_start, line)?;

        self.patch_jump(exit_jump, line)?;
        self.emit(OpCode::Pop, line);

        self.end_scope(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::compiler::Compiler;
    use crate::bytecode::instruction::OpCode;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> Vec<u8> {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        Compiler::compile(&program).unwrap().code().to_vec()
    }

    use OpCode::*;

    fn ops(ops: &[OpCode]) -> Vec<u8> {
        ops.iter().map(|op| *op as u8).collect()
    }

    #[test]
    fn test_if_else_layout() {
        let code = compile("if (true) print 1; else print 2;");
        let mut expected = ops(&[True, JumpIfFalse]);
        expected.extend([0, 7]);
        expected.extend(ops(&[Pop, Constant]));
        expected.push(0);
        expected.extend(ops(&[Print, Jump]));
        expected.extend([0, 4]);
        expected.extend(ops(&[Pop, Constant]));
        expected.push(1);
        expected.extend(ops(&[Print, Nil, Return]));
        assert_eq!(code, expected);
    }

    #[test]
    fn test_if_without_else_still_pops_condition() {
        let code = compile("if (false) print 1;");
        let mut expected = ops(&[False, JumpIfFalse]);
        expected.extend([0, 7]);
        expected.extend(ops(&[Pop, Constant]));
        expected.push(0);
        expected.extend(ops(&[Print, Jump]));
        expected.extend([0, 1]);
        expected.extend(ops(&[Pop, Nil, Return]));
        assert_eq!(code, expected);
    }

    #[test]
    fn test_while_layout() {
        let code = compile("while (false) print 1;");
        // 0: FALSE, 1: JIF +7, 4: POP, 5: CONSTANT 0, 7: PRINT, 8: LOOP 11, 11: POP
        let mut expected = ops(&[False, JumpIfFalse]);
        expected.extend([0, 7]);
        expected.extend(ops(&[Pop, Constant]));
        expected.push(0);
        expected.extend(ops(&[Print, Loop]));
        expected.extend([0, 11]);
        expected.extend(ops(&[Pop, Nil, Return]));
        assert_eq!(code, expected);
    }

    #[test]
    fn test_block_locals_use_slots() {
        let code = compile("{ var a = 1; var b = a; b = 2; }");
        let mut expected = ops(&[Constant]);
        expected.push(0);
        expected.extend(ops(&[GetLocal]));
        expected.push(0);
        expected.extend(ops(&[Constant]));
        expected.push(1);
        expected.extend(ops(&[SetLocal]));
        expected.push(1);
        expected.extend(ops(&[Pop, Pop, Pop, Nil, Return]));
        assert_eq!(code, expected);
    }
}
