//! Parenthesized prefix rendering of the AST, used by `--ast` and parser tests.

use crate::ast::expr::{Expr, ExprKind};
use crate::ast::stmt::{Program, Stmt, StmtKind};

/// Render a program, one top-level statement per line.
pub fn print_program(program: &Program) -> String {
    program
        .statements
        .iter()
        .map(print_stmt)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_stmt(stmt: &Stmt) -> String {
    match &stmt.kind {
        StmtKind::Expression(expr) => format!("(; {})", print_expr(expr)),
        StmtKind::Print(expr) => format!("(print {})", print_expr(expr)),
        StmtKind::Var {
            name,
            type_annotation,
            initializer,
        } => {
            let mut out = String::from("(var ");
            if let Some(ty) = type_annotation {
                out.push_str(&format!("{} ", ty));
            }
            out.push_str(name);
            if let Some(init) = initializer {
                out.push_str(&format!(" = {}", print_expr(init)));
            }
            out.push(')');
            out
        }
        StmtKind::Block(statements) => {
            let mut out = String::from("(block");
            for s in statements {
                out.push(' ');
                out.push_str(&print_stmt(s));
            }
            out.push(')');
            out
        }
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => match else_branch {
            Some(else_branch) => format!(
                "(if {} {} {})",
                print_expr(condition),
                print_stmt(then_branch),
                print_stmt(else_branch)
            ),
            None => format!("(if {} {})", print_expr(condition), print_stmt(then_branch)),
        },
        StmtKind::While { condition, body } => {
            format!("(while {} {})", print_expr(condition), print_stmt(body))
        }
        StmtKind::For {
            variable,
            limit,
            body,
        } => format!(
            "(for {} {} {})",
            variable,
            print_expr(limit),
            print_stmt(body)
        ),
    }
}

pub fn print_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::NumberLiteral(n) => format!("{}", n),
        ExprKind::StringLiteral(s) => format!("\"{}\"", s),
        ExprKind::BoolLiteral(b) => format!("{}", b),
        ExprKind::Nil => "nil".to_string(),
        ExprKind::Variable(name) => name.clone(),
        ExprKind::Assign { name, value } => format!("(= {} {})", name, print_expr(value)),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => format!("({} {} {})", operator, print_expr(left), print_expr(right)),
        ExprKind::Unary { operator, operand } => {
            format!("({} {})", operator, print_expr(operand))
        }
        ExprKind::LogicalAnd { left, right } => {
            format!("(and {} {})", print_expr(left), print_expr(right))
        }
        ExprKind::LogicalOr { left, right } => {
            format!("(or {} {})", print_expr(left), print_expr(right))
        }
        ExprKind::Grouping(inner) => format!("(group {})", print_expr(inner)),
    }
}
