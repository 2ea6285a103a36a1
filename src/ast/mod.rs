//! Abstract Syntax Tree for Ferrule.

pub mod expr;
pub mod printer;
pub mod stmt;
pub mod types;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{Program, Stmt, StmtKind};
pub use types::{TypeAnnotation, TypeKind};
