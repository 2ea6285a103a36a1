//! Static scope checks run between parsing and compilation.
//!
//! Only block scopes are tracked; globals are late-bound and may be used before
//! they are declared. Two mistakes are rejected:
//! - reading a local inside its own initializer (`{ var a = a; }`)
//! - declaring the same name twice in one block

use std::collections::HashMap;

use crate::ast::*;
use crate::error::ResolveError;

pub struct Resolver {
    /// Innermost scope last. `false` until the initializer has been resolved.
    scopes: Vec<HashMap<String, bool>>,
    errors: Vec<ResolveError>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn resolve(mut self, program: &Program) -> Result<(), Vec<ResolveError>> {
        for stmt in &program.statements {
            self.resolve_stmt(stmt);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expression(expr) | StmtKind::Print(expr) => self.resolve_expr(expr),
            StmtKind::Var {
                name, initializer, ..
            } => {
                self.declare(name, stmt);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            StmtKind::Block(statements) => {
                self.scopes.push(HashMap::new());
                for s in statements {
                    self.resolve_stmt(s);
                }
                self.scopes.pop();
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            StmtKind::For {
                variable,
                limit,
                body,
            } => {
                // The limit is evaluated before the loop variable exists.
                self.resolve_expr(limit);
                let mut scope = HashMap::new();
                scope.insert(variable.clone(), true);
                self.scopes.push(scope);
                self.resolve_stmt(body);
                self.scopes.pop();
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::NumberLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::Nil => {}
            ExprKind::Variable(name) => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(name) == Some(&false) {
                        self.errors
                            .push(ResolveError::self_referential(name, expr.span));
                    }
                }
            }
            ExprKind::Assign { value, .. } => self.resolve_expr(value),
            ExprKind::Binary { left, right, .. }
            | ExprKind::LogicalAnd { left, right }
            | ExprKind::LogicalOr { left, right } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
        }
    }

    fn declare(&mut self, name: &str, stmt: &Stmt) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(name) {
            self.errors.push(ResolveError::redeclared(name, stmt.span));
            return;
        }
        scope.insert(name.to_string(), false);
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
