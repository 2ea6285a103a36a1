//! Expression compilation: AST expressions to bytecode. Each expression
//! leaves exactly one value on the stack.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::bytecode::value::Value;

use super::compiler::{CompileResult, Compiler, VariableAccess};
use super::instruction::OpCode;

impl Compiler {
    pub fn compile_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        let line = expr.span.line;
        match &expr.kind {
            ExprKind::NumberLiteral(n) => self.emit_constant(Value::Number(*n), line)?,
            ExprKind::StringLiteral(s) => self.emit_constant(Value::String(s.clone()), line)?,
            ExprKind::BoolLiteral(true) => self.emit(OpCode::True, line),
            ExprKind::BoolLiteral(false) => self.emit(OpCode::False, line),
            ExprKind::Nil => self.emit(OpCode::Nil, line),

            ExprKind::Variable(name) => match self.resolve_variable(name, line)? {
                VariableAccess::Local(slot) => self.emit_with_operand(OpCode::GetLocal, slot, line),
                VariableAccess::Global(index) => {
                    self.emit_with_operand(OpCode::GetGlobal, index, line)
                }
            },

            ExprKind::Assign { name, value } => {
                self.compile_expr(value)?;
                match self.resolve_variable(name, line)? {
                    VariableAccess::Local(slot) => {
                        self.emit_with_operand(OpCode::SetLocal, slot, line)
                    }
                    VariableAccess::Global(index) => {
                        self.emit_with_operand(OpCode::SetGlobal, index, line)
                    }
                }
            }

            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                self.compile_expr(left)?;
                self.compile_expr(right)?;
                self.compile_binary_op(*operator, line);
            }

            ExprKind::Unary { operator, operand } => {
                self.compile_expr(operand)?;
                match operator {
                    UnaryOp::Negate => self.emit(OpCode::Negate, line),
                    UnaryOp::Not => self.emit(OpCode::Not, line),
                }
            }

            ExprKind::LogicalAnd { left, right } => {
                self.compile_expr(left)?;
                let end_jump = self.emit_jump(OpCode::JumpIfFalse, line);
                self.emit(OpCode::Pop, line);
                self.compile_expr(right)?;
                self.patch_jump(end_jump, line)?;
            }

            ExprKind::LogicalOr { left, right } => {
                self.compile_expr(left)?;
                let else_jump = self.emit_jump(OpCode::JumpIfFalse, line);
                let end_jump = self.emit_jump(OpCode::Jump, line);
                self.patch_jump(else_jump, line)?;
                self.emit(OpCode::Pop, line);
                self.compile_expr(right)?;
                self.patch_jump(end_jump, line)?;
            }

            ExprKind::Grouping(inner) => self.compile_expr(inner)?,
        }
        Ok(())
    }

    /// `!=`, `>=` and `<=` are the negations of `==`, `<` and `>`.
    fn compile_binary_op(&mut self, operator: BinaryOp, line: usize) {
        match operator {
            BinaryOp::Add => self.emit(OpCode::Add, line),
            BinaryOp::Subtract => self.emit(OpCode::Subtract, line),
            BinaryOp::Multiply => self.emit(OpCode::Multiply, line),
            BinaryOp::Divide => self.emit(OpCode::Divide, line),
            BinaryOp::Equal => self.emit(OpCode::Equal, line),
            BinaryOp::NotEqual => {
                self.emit(OpCode::Equal, line);
                self.emit(OpCode::Not, line);
            }
            BinaryOp::Greater => self.emit(OpCode::Greater, line),
            BinaryOp::GreaterEqual => {
                self.emit(OpCode::Less, line);
                self.emit(OpCode::Not, line);
            }
            BinaryOp::Less => self.emit(OpCode::Less, line),
            BinaryOp::LessEqual => {
                self.emit(OpCode::Greater, line);
                self.emit(OpCode::Not, line);
            }
        }
    }
}
